//! Application layer: session snapshot and the service facade.

mod service;
mod snapshot;

pub use service::{DashboardStats, PriceTracker};
pub use snapshot::{Collection, SnapshotCache, SnapshotUpdate};
