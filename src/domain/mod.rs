//! Store-agnostic domain logic.

mod alert;
mod comparison;
mod history;
mod id;
mod price;
mod product;
mod supplier;

// Core entity types
pub use id::{PriceId, ProductId, SupplierId, UserId};
pub use price::{Price, PriceDraft, PriceWithDetails};
pub use product::{distinct_categories, Product, ProductDraft};
pub use supplier::{Supplier, SupplierDraft};

// Derived aggregation types
pub use comparison::{build_comparison, PriceComparison, SavingsPotential, SupplierQuote};
pub use history::{build_history, PriceHistory};

// Alert rule
pub use alert::{significant_differences, AlertConfig, PriceAlert};
