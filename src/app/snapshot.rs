//! Session-scoped snapshot of the user's records, with refresh
//! generations and optional update notifications.

use parking_lot::RwLock;
use tokio::sync::broadcast;

use crate::domain::{PriceId, PriceWithDetails, Product, ProductId, Supplier, SupplierId};

/// The three cached record collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Suppliers,
    Products,
    Prices,
}

impl Collection {
    const fn index(self) -> usize {
        match self {
            Self::Suppliers => 0,
            Self::Products => 1,
            Self::Prices => 2,
        }
    }
}

/// Notification sent when a cached collection changes.
#[derive(Debug, Clone)]
pub struct SnapshotUpdate {
    /// The collection that changed.
    pub collection: Collection,
}

#[derive(Default)]
struct State {
    suppliers: Vec<Supplier>,
    products: Vec<Product>,
    prices: Vec<PriceWithDetails>,
    loading: bool,
    error: Option<String>,
    // Per-collection refresh generation, bumped at issue time.
    issued: [u64; 3],
}

/// In-memory view of the signed-in user's suppliers, products, and joined
/// prices, with loading/error state.
///
/// Refreshes carry a generation token taken at issue time; a result whose
/// token has been superseded by a newer refresh (or a [`clear`]) is
/// discarded, so a slow fetch can never overwrite a newer one.
///
/// [`clear`]: SnapshotCache::clear
pub struct SnapshotCache {
    inner: RwLock<State>,
    /// Broadcast sender for update notifications.
    /// Wrapped in Option to allow construction without notifications.
    tx: Option<broadcast::Sender<SnapshotUpdate>>,
}

impl SnapshotCache {
    /// Create a new cache without notifications.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(State::default()),
            tx: None,
        }
    }

    /// Create a new cache with broadcast notifications.
    ///
    /// Returns the cache and a receiver for subscribing to updates.
    /// Additional receivers can be created via `subscribe()`.
    #[must_use]
    pub fn with_notifications(capacity: usize) -> (Self, broadcast::Receiver<SnapshotUpdate>) {
        let (tx, rx) = broadcast::channel(capacity);
        let cache = Self {
            inner: RwLock::new(State::default()),
            tx: Some(tx),
        };
        (cache, rx)
    }

    /// Subscribe to update notifications.
    ///
    /// Returns `None` if the cache was created without notifications.
    #[must_use]
    pub fn subscribe(&self) -> Option<broadcast::Receiver<SnapshotUpdate>> {
        self.tx.as_ref().map(|tx| tx.subscribe())
    }

    fn notify(&self, collection: Collection) {
        // Ignore send errors - no receivers is fine
        if let Some(ref tx) = self.tx {
            let _ = tx.send(SnapshotUpdate { collection });
        }
    }

    /// Snapshot of the cached suppliers.
    #[must_use]
    pub fn suppliers(&self) -> Vec<Supplier> {
        self.inner.read().suppliers.clone()
    }

    /// Snapshot of the cached products.
    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        self.inner.read().products.clone()
    }

    /// Snapshot of the cached joined price rows.
    #[must_use]
    pub fn prices(&self) -> Vec<PriceWithDetails> {
        self.inner.read().prices.clone()
    }

    /// Whether an operation is in flight.
    #[must_use]
    pub fn loading(&self) -> bool {
        self.inner.read().loading
    }

    /// Set the loading flag.
    pub fn set_loading(&self, loading: bool) {
        self.inner.write().loading = loading;
    }

    /// The last operation error, if any.
    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.inner.read().error.clone()
    }

    /// Record an operation error for the UI to surface.
    pub fn set_error(&self, message: impl Into<String>) {
        self.inner.write().error = Some(message.into());
    }

    /// Clear the error state, typically at operation start.
    pub fn clear_error(&self) {
        self.inner.write().error = None;
    }

    /// Start a refresh of one collection.
    ///
    /// Bumps the collection's generation and returns the token the
    /// eventual result must present to be applied.
    pub fn begin_refresh(&self, collection: Collection) -> u64 {
        let mut state = self.inner.write();
        state.issued[collection.index()] += 1;
        state.issued[collection.index()]
    }

    /// Apply a supplier refresh result unless a newer refresh superseded it.
    ///
    /// Returns whether the rows were applied.
    pub fn apply_suppliers(&self, token: u64, rows: Vec<Supplier>) -> bool {
        {
            let mut state = self.inner.write();
            if state.issued[Collection::Suppliers.index()] != token {
                return false;
            }
            state.suppliers = rows;
        }
        self.notify(Collection::Suppliers);
        true
    }

    /// Apply a product refresh result unless a newer refresh superseded it.
    pub fn apply_products(&self, token: u64, rows: Vec<Product>) -> bool {
        {
            let mut state = self.inner.write();
            if state.issued[Collection::Products.index()] != token {
                return false;
            }
            state.products = rows;
        }
        self.notify(Collection::Products);
        true
    }

    /// Apply a price refresh result unless a newer refresh superseded it.
    pub fn apply_prices(&self, token: u64, rows: Vec<PriceWithDetails>) -> bool {
        {
            let mut state = self.inner.write();
            if state.issued[Collection::Prices.index()] != token {
                return false;
            }
            state.prices = rows;
        }
        self.notify(Collection::Prices);
        true
    }

    /// Splice a created or updated supplier into the cached list.
    pub fn upsert_supplier(&self, supplier: Supplier) {
        {
            let mut state = self.inner.write();
            match state.suppliers.iter_mut().find(|s| s.id() == supplier.id()) {
                Some(slot) => *slot = supplier,
                None => state.suppliers.push(supplier),
            }
        }
        self.notify(Collection::Suppliers);
    }

    /// Splice a deleted supplier out of the cached list.
    pub fn remove_supplier(&self, id: &SupplierId) {
        self.inner.write().suppliers.retain(|s| s.id() != id);
        self.notify(Collection::Suppliers);
    }

    /// Splice a created or updated product into the cached list.
    pub fn upsert_product(&self, product: Product) {
        {
            let mut state = self.inner.write();
            match state.products.iter_mut().find(|p| p.id() == product.id()) {
                Some(slot) => *slot = product,
                None => state.products.push(product),
            }
        }
        self.notify(Collection::Products);
    }

    /// Splice a deleted product out of the cached list.
    pub fn remove_product(&self, id: &ProductId) {
        self.inner.write().products.retain(|p| p.id() != id);
        self.notify(Collection::Products);
    }

    /// Splice a deleted price out of the cached list.
    ///
    /// Creates and updates refetch the joined collection instead, because
    /// they change joined display data.
    pub fn remove_price(&self, id: &PriceId) {
        self.inner.write().prices.retain(|p| p.price().id() != id);
        self.notify(Collection::Prices);
    }

    /// Drop all cached records and error state, on sign-out.
    ///
    /// Bumps every generation so in-flight refresh results are discarded.
    pub fn clear(&self) {
        {
            let mut state = self.inner.write();
            state.suppliers.clear();
            state.products.clear();
            state.prices.clear();
            state.error = None;
            state.loading = false;
            for issued in &mut state.issued {
                *issued += 1;
            }
        }
        self.notify(Collection::Suppliers);
        self.notify(Collection::Products);
        self.notify(Collection::Prices);
    }
}

impl Default for SnapshotCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn supplier(id: &str, name: &str) -> Supplier {
        Supplier::new(
            SupplierId::from(id),
            name,
            None,
            None,
            None,
            None,
            Utc.timestamp_opt(0, 0).unwrap(),
        )
    }

    #[test]
    fn apply_with_current_token_succeeds() {
        let cache = SnapshotCache::new();
        let token = cache.begin_refresh(Collection::Suppliers);

        assert!(cache.apply_suppliers(token, vec![supplier("s1", "Acme")]));
        assert_eq!(cache.suppliers().len(), 1);
    }

    #[test]
    fn stale_token_is_discarded() {
        let cache = SnapshotCache::new();
        let stale = cache.begin_refresh(Collection::Suppliers);
        let fresh = cache.begin_refresh(Collection::Suppliers);

        // The newer refresh completes first.
        assert!(cache.apply_suppliers(fresh, vec![supplier("s2", "Bolt Co")]));
        // The older one resolves late and must not overwrite it.
        assert!(!cache.apply_suppliers(stale, vec![supplier("s1", "Acme")]));

        let names: Vec<String> = cache
            .suppliers()
            .iter()
            .map(|s| s.name().to_string())
            .collect();
        assert_eq!(names, vec!["Bolt Co"]);
    }

    #[test]
    fn clear_discards_in_flight_refreshes() {
        let cache = SnapshotCache::new();
        let token = cache.begin_refresh(Collection::Suppliers);
        cache.clear();

        assert!(!cache.apply_suppliers(token, vec![supplier("s1", "Acme")]));
        assert!(cache.suppliers().is_empty());
    }

    #[test]
    fn generations_are_tracked_per_collection() {
        let cache = SnapshotCache::new();
        let suppliers_token = cache.begin_refresh(Collection::Suppliers);
        let _ = cache.begin_refresh(Collection::Products);

        // Bumping the product generation must not invalidate suppliers.
        assert!(cache.apply_suppliers(suppliers_token, vec![supplier("s1", "Acme")]));
    }

    #[test]
    fn upsert_replaces_matching_id() {
        let cache = SnapshotCache::new();
        cache.upsert_supplier(supplier("s1", "Acme"));
        cache.upsert_supplier(supplier("s1", "Acme Wholesale"));

        let suppliers = cache.suppliers();
        assert_eq!(suppliers.len(), 1);
        assert_eq!(suppliers[0].name(), "Acme Wholesale");
    }

    #[test]
    fn remove_splices_by_id() {
        let cache = SnapshotCache::new();
        cache.upsert_supplier(supplier("s1", "Acme"));
        cache.upsert_supplier(supplier("s2", "Bolt Co"));

        cache.remove_supplier(&SupplierId::from("s1"));
        assert_eq!(cache.suppliers().len(), 1);
    }

    #[test]
    fn clear_resets_error_state() {
        let cache = SnapshotCache::new();
        cache.set_error("Failed to fetch suppliers");
        assert!(cache.error().is_some());

        cache.clear();
        assert!(cache.error().is_none());
    }

    #[tokio::test]
    async fn notifications_are_sent_on_apply() {
        let (cache, mut rx) = SnapshotCache::with_notifications(16);
        let token = cache.begin_refresh(Collection::Suppliers);
        cache.apply_suppliers(token, vec![supplier("s1", "Acme")]);

        let update = rx.recv().await.unwrap();
        assert_eq!(update.collection, Collection::Suppliers);
    }

    #[test]
    fn subscribe_requires_notifications() {
        let (cache, _rx) = SnapshotCache::with_notifications(16);
        assert!(cache.subscribe().is_some());

        let cache_no_notify = SnapshotCache::new();
        assert!(cache_no_notify.subscribe().is_none());
    }
}
