//! Pricelens - supplier price tracking and comparison.
//!
//! This crate turns a shopkeeper's flat, date-ordered price records into
//! the derived views a tracking UI needs: per-product latest-price
//! comparisons across suppliers, date-aligned history series for
//! charting, and spread alerts.
//!
//! # Architecture
//!
//! Persistence and authentication live behind ports; the aggregation
//! core is pure functions over rows the store returns in a documented
//! order:
//!
//! - **`domain`** - Entities, drafts, and the three derived shapes
//!   - [`domain::PriceComparison`] - each supplier's latest quote per product
//!   - [`domain::PriceHistory`] - compacted per-supplier series over a date axis
//!   - [`domain::PriceAlert`] - products whose spread exceeds the threshold
//! - **`port`** - [`port::RecordStore`] and [`port::AuthProvider`] contracts
//! - **`adapter::rest`** - PostgREST-style store client
//! - **`app`** - [`app::SnapshotCache`] and the [`app::PriceTracker`] facade
//!
//! # Modules
//!
//! - [`config`] - Configuration loading from TOML files and the environment
//! - [`domain`] - Store-agnostic types and aggregation
//! - [`error`] - Error types for the crate
//! - [`port`] - Trait definitions for external collaborators
//! - [`adapter`] - Concrete collaborator implementations
//! - [`app`] - Session snapshot and service facade
//!
//! # Features
//!
//! - `testkit` - In-memory store/auth collaborators and fixture builders
//!
//! # Example
//!
//! ```
//! use pricelens::domain::{PriceComparison, ProductId, SavingsPotential, SupplierId, SupplierQuote};
//! use rust_decimal_macros::dec;
//!
//! let date: chrono::NaiveDate = "2024-01-02".parse().unwrap();
//! let comparison = PriceComparison::new(
//!     ProductId::from("widget"),
//!     "Widget",
//!     vec![
//!         SupplierQuote::new(SupplierId::from("a"), "Acme", dec!(10), date),
//!         SupplierQuote::new(SupplierId::from("b"), "Bolt Co", dec!(12), date),
//!     ],
//! );
//!
//! assert_eq!(comparison.best_supplier().unwrap().supplier_name(), "Acme");
//! assert_eq!(comparison.price_difference_percentage(), dec!(20));
//! assert_eq!(comparison.savings_potential(), SavingsPotential::High);
//! ```

pub mod adapter;
pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
