//! Application facade tying the auth and store collaborators to the
//! snapshot cache and the derived views.
//!
//! Store failures never propagate past an operation: they are logged,
//! recorded as a human-readable error string on the snapshot, and the
//! operation resolves to a neutral value (empty list, `None`, `false`).
//! Derived data already handed out stays untouched - stale-but-present
//! beats cleared.

use chrono::NaiveDate;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::domain::{
    build_comparison, build_history, significant_differences, AlertConfig, Price, PriceAlert,
    PriceComparison, PriceDraft, PriceHistory, PriceId, PriceWithDetails, Product, ProductDraft,
    ProductId, Supplier, SupplierDraft, SupplierId, UserId,
};
use crate::error::Result;
use crate::port::auth::{AuthProvider, SessionEvent};
use crate::port::store::{DateOrder, PriceFilter, RecordStore};

use super::snapshot::{Collection, SnapshotCache};

/// Number of price rows surfaced in the dashboard activity feed.
const RECENT_PRICE_LIMIT: usize = 5;

/// Headline numbers for the dashboard view.
#[derive(Debug, Clone)]
pub struct DashboardStats {
    pub supplier_count: usize,
    pub product_count: usize,
    pub price_count: usize,
    /// Prices dated on the caller-supplied "today".
    pub todays_updates: usize,
    /// The most recent price rows, newest first.
    pub recent_prices: Vec<PriceWithDetails>,
}

/// The price-tracking service consumed by UI collaborators.
///
/// Owns the session snapshot and delegates persistence and
/// authentication to the injected collaborators.
pub struct PriceTracker<S, A> {
    store: S,
    auth: A,
    snapshot: SnapshotCache,
    alerts: AlertConfig,
}

impl<S: RecordStore, A: AuthProvider> PriceTracker<S, A> {
    /// Create a tracker with the default alert threshold.
    pub fn new(store: S, auth: A) -> Self {
        Self::with_config(store, auth, AlertConfig::default())
    }

    /// Create a tracker with an explicit alert configuration.
    pub fn with_config(store: S, auth: A, alerts: AlertConfig) -> Self {
        Self {
            store,
            auth,
            snapshot: SnapshotCache::new(),
            alerts,
        }
    }

    /// Access the session snapshot (collections, loading/error state,
    /// update subscriptions).
    #[must_use]
    pub const fn snapshot(&self) -> &SnapshotCache {
        &self.snapshot
    }

    fn user(&self) -> Option<UserId> {
        self.auth.current_user()
    }

    // --- session ---

    /// The currently signed-in user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<UserId> {
        self.user()
    }

    /// Sign in and populate the snapshot.
    ///
    /// # Errors
    ///
    /// Propagates the auth collaborator's failure; the snapshot is left
    /// untouched in that case.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<UserId> {
        let user = self.auth.sign_in(email, password).await?;
        self.refresh_all().await;
        Ok(user)
    }

    /// Create an account, sign in, and populate the snapshot.
    ///
    /// # Errors
    ///
    /// Propagates the auth collaborator's failure.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<UserId> {
        let user = self.auth.sign_up(email, password).await?;
        self.refresh_all().await;
        Ok(user)
    }

    /// Sign out and clear the snapshot.
    ///
    /// # Errors
    ///
    /// Propagates the auth collaborator's failure.
    pub async fn sign_out(&self) -> Result<()> {
        self.auth.sign_out().await?;
        self.snapshot.clear();
        Ok(())
    }

    /// React to one session change: fetch on login, clear on logout.
    pub async fn handle_session_event(&self, event: SessionEvent) {
        match event {
            SessionEvent::SignedIn(user) => {
                debug!(user = %user, "session opened, refreshing snapshot");
                self.refresh_all().await;
            }
            SessionEvent::SignedOut => {
                debug!("session closed, clearing snapshot");
                self.snapshot.clear();
            }
        }
    }

    /// Drive the snapshot from the auth collaborator's session events
    /// until the auth side closes its channel.
    pub async fn run_session_listener(&self) {
        let mut rx = self.auth.subscribe();
        loop {
            match rx.recv().await {
                Ok(event) => self.handle_session_event(event).await,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "session listener lagged, resyncing snapshot");
                    if self.user().is_some() {
                        self.refresh_all().await;
                    } else {
                        self.snapshot.clear();
                    }
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    // --- snapshot refreshes ---

    /// Refresh all three collections sequentially.
    pub async fn refresh_all(&self) {
        self.refresh_suppliers().await;
        self.refresh_products().await;
        self.refresh_prices().await;
    }

    /// Refetch the supplier collection. Returns whether the result was
    /// applied (a newer refresh or sign-out discards it).
    pub async fn refresh_suppliers(&self) -> bool {
        let Some(user) = self.user() else {
            return false;
        };
        let token = self.snapshot.begin_refresh(Collection::Suppliers);
        self.snapshot.set_loading(true);
        self.snapshot.clear_error();

        let applied = match self.store.list_suppliers(&user).await {
            Ok(rows) => self.snapshot.apply_suppliers(token, rows),
            Err(err) => {
                warn!(error = %err, "failed to fetch suppliers");
                self.snapshot.set_error("Failed to fetch suppliers");
                false
            }
        };
        self.snapshot.set_loading(false);
        applied
    }

    /// Refetch the product collection.
    pub async fn refresh_products(&self) -> bool {
        let Some(user) = self.user() else {
            return false;
        };
        let token = self.snapshot.begin_refresh(Collection::Products);
        self.snapshot.set_loading(true);
        self.snapshot.clear_error();

        let applied = match self.store.list_products(&user).await {
            Ok(rows) => self.snapshot.apply_products(token, rows),
            Err(err) => {
                warn!(error = %err, "failed to fetch products");
                self.snapshot.set_error("Failed to fetch products");
                false
            }
        };
        self.snapshot.set_loading(false);
        applied
    }

    /// Refetch the joined price collection, most recent first.
    pub async fn refresh_prices(&self) -> bool {
        let Some(user) = self.user() else {
            return false;
        };
        let token = self.snapshot.begin_refresh(Collection::Prices);
        self.snapshot.set_loading(true);
        self.snapshot.clear_error();

        let applied = match self.store.list_prices(&user, PriceFilter::all()).await {
            Ok(rows) => self.snapshot.apply_prices(token, rows),
            Err(err) => {
                warn!(error = %err, "failed to fetch prices");
                self.snapshot.set_error("Failed to fetch prices");
                false
            }
        };
        self.snapshot.set_loading(false);
        applied
    }

    // --- suppliers ---

    /// Fetch one supplier by ID.
    pub async fn get_supplier(&self, id: &SupplierId) -> Option<Supplier> {
        let user = self.user()?;
        match self.store.get_supplier(&user, id).await {
            Ok(found) => found,
            Err(err) => {
                warn!(error = %err, supplier = %id, "failed to fetch supplier");
                self.snapshot.set_error("Failed to fetch supplier");
                None
            }
        }
    }

    /// Create a supplier and splice it into the snapshot.
    pub async fn create_supplier(&self, draft: SupplierDraft) -> Option<Supplier> {
        let user = self.user()?;
        self.snapshot.clear_error();
        if let Err(err) = draft.validate() {
            self.snapshot.set_error(err.to_string());
            return None;
        }
        self.snapshot.set_loading(true);

        let created = match self.store.insert_supplier(&user, draft).await {
            Ok(supplier) => {
                self.snapshot.upsert_supplier(supplier.clone());
                Some(supplier)
            }
            Err(err) => {
                warn!(error = %err, "failed to create supplier");
                self.snapshot.set_error("Failed to create supplier");
                None
            }
        };
        self.snapshot.set_loading(false);
        created
    }

    /// Update a supplier and splice the result into the snapshot.
    pub async fn update_supplier(&self, id: &SupplierId, draft: SupplierDraft) -> Option<Supplier> {
        let user = self.user()?;
        self.snapshot.clear_error();
        if let Err(err) = draft.validate() {
            self.snapshot.set_error(err.to_string());
            return None;
        }
        self.snapshot.set_loading(true);

        let updated = match self.store.update_supplier(&user, id, draft).await {
            Ok(supplier) => {
                self.snapshot.upsert_supplier(supplier.clone());
                Some(supplier)
            }
            Err(err) => {
                warn!(error = %err, supplier = %id, "failed to update supplier");
                self.snapshot.set_error("Failed to update supplier");
                None
            }
        };
        self.snapshot.set_loading(false);
        updated
    }

    /// Delete a supplier and splice it out of the snapshot.
    pub async fn delete_supplier(&self, id: &SupplierId) -> bool {
        let Some(user) = self.user() else {
            return false;
        };
        self.snapshot.clear_error();
        self.snapshot.set_loading(true);

        let deleted = match self.store.delete_supplier(&user, id).await {
            Ok(deleted) => {
                if deleted {
                    self.snapshot.remove_supplier(id);
                }
                deleted
            }
            Err(err) => {
                warn!(error = %err, supplier = %id, "failed to delete supplier");
                self.snapshot.set_error("Failed to delete supplier");
                false
            }
        };
        self.snapshot.set_loading(false);
        deleted
    }

    // --- products ---

    /// Fetch one product by ID.
    pub async fn get_product(&self, id: &ProductId) -> Option<Product> {
        let user = self.user()?;
        match self.store.get_product(&user, id).await {
            Ok(found) => found,
            Err(err) => {
                warn!(error = %err, product = %id, "failed to fetch product");
                self.snapshot.set_error("Failed to fetch product");
                None
            }
        }
    }

    /// Create a product and splice it into the snapshot.
    pub async fn create_product(&self, draft: ProductDraft) -> Option<Product> {
        let user = self.user()?;
        self.snapshot.clear_error();
        if let Err(err) = draft.validate() {
            self.snapshot.set_error(err.to_string());
            return None;
        }
        self.snapshot.set_loading(true);

        let created = match self.store.insert_product(&user, draft).await {
            Ok(product) => {
                self.snapshot.upsert_product(product.clone());
                Some(product)
            }
            Err(err) => {
                warn!(error = %err, "failed to create product");
                self.snapshot.set_error("Failed to create product");
                None
            }
        };
        self.snapshot.set_loading(false);
        created
    }

    /// Update a product and splice the result into the snapshot.
    pub async fn update_product(&self, id: &ProductId, draft: ProductDraft) -> Option<Product> {
        let user = self.user()?;
        self.snapshot.clear_error();
        if let Err(err) = draft.validate() {
            self.snapshot.set_error(err.to_string());
            return None;
        }
        self.snapshot.set_loading(true);

        let updated = match self.store.update_product(&user, id, draft).await {
            Ok(product) => {
                self.snapshot.upsert_product(product.clone());
                Some(product)
            }
            Err(err) => {
                warn!(error = %err, product = %id, "failed to update product");
                self.snapshot.set_error("Failed to update product");
                None
            }
        };
        self.snapshot.set_loading(false);
        updated
    }

    /// Delete a product and splice it out of the snapshot.
    pub async fn delete_product(&self, id: &ProductId) -> bool {
        let Some(user) = self.user() else {
            return false;
        };
        self.snapshot.clear_error();
        self.snapshot.set_loading(true);

        let deleted = match self.store.delete_product(&user, id).await {
            Ok(deleted) => {
                if deleted {
                    self.snapshot.remove_product(id);
                }
                deleted
            }
            Err(err) => {
                warn!(error = %err, product = %id, "failed to delete product");
                self.snapshot.set_error("Failed to delete product");
                false
            }
        };
        self.snapshot.set_loading(false);
        deleted
    }

    /// Distinct, sorted categories across the cached products.
    #[must_use]
    pub fn product_categories(&self) -> Vec<String> {
        crate::domain::distinct_categories(&self.snapshot.products())
    }

    // --- prices ---

    /// Fetch one joined price row by ID.
    pub async fn get_price(&self, id: &PriceId) -> Option<PriceWithDetails> {
        let user = self.user()?;
        match self.store.get_price(&user, id).await {
            Ok(found) => found,
            Err(err) => {
                warn!(error = %err, price = %id, "failed to fetch price");
                self.snapshot.set_error("Failed to fetch price");
                None
            }
        }
    }

    /// One product's joined price rows, most recent first.
    pub async fn fetch_prices_by_product(&self, product_id: &ProductId) -> Vec<PriceWithDetails> {
        let Some(user) = self.user() else {
            return Vec::new();
        };
        match self
            .store
            .list_prices(&user, PriceFilter::for_product(product_id.clone()))
            .await
        {
            Ok(rows) => rows,
            Err(err) => {
                warn!(error = %err, product = %product_id, "failed to fetch prices");
                self.snapshot.set_error("Failed to fetch prices");
                Vec::new()
            }
        }
    }

    /// One supplier's joined price rows, most recent first.
    pub async fn fetch_prices_by_supplier(&self, supplier_id: &SupplierId) -> Vec<PriceWithDetails> {
        let Some(user) = self.user() else {
            return Vec::new();
        };
        match self
            .store
            .list_prices(&user, PriceFilter::for_supplier(supplier_id.clone()))
            .await
        {
            Ok(rows) => rows,
            Err(err) => {
                warn!(error = %err, supplier = %supplier_id, "failed to fetch prices");
                self.snapshot.set_error("Failed to fetch prices");
                Vec::new()
            }
        }
    }

    /// Record a quote, then refetch the joined collection (the new row
    /// changes joined display data, so splicing is not enough).
    pub async fn create_price(&self, draft: PriceDraft) -> Option<Price> {
        let user = self.user()?;
        self.snapshot.clear_error();
        if let Err(err) = draft.validate() {
            self.snapshot.set_error(err.to_string());
            return None;
        }
        self.snapshot.set_loading(true);

        let created = match self.store.insert_price(&user, draft).await {
            Ok(price) => Some(price),
            Err(err) => {
                warn!(error = %err, "failed to create price");
                self.snapshot.set_error("Failed to create price");
                None
            }
        };
        self.snapshot.set_loading(false);

        if created.is_some() {
            self.refresh_prices().await;
        }
        created
    }

    /// Update a quote, then refetch the joined collection.
    pub async fn update_price(&self, id: &PriceId, draft: PriceDraft) -> Option<Price> {
        let user = self.user()?;
        self.snapshot.clear_error();
        if let Err(err) = draft.validate() {
            self.snapshot.set_error(err.to_string());
            return None;
        }
        self.snapshot.set_loading(true);

        let updated = match self.store.update_price(&user, id, draft).await {
            Ok(price) => Some(price),
            Err(err) => {
                warn!(error = %err, price = %id, "failed to update price");
                self.snapshot.set_error("Failed to update price");
                None
            }
        };
        self.snapshot.set_loading(false);

        if updated.is_some() {
            self.refresh_prices().await;
        }
        updated
    }

    /// Delete a quote and splice it out of the snapshot.
    pub async fn delete_price(&self, id: &PriceId) -> bool {
        let Some(user) = self.user() else {
            return false;
        };
        self.snapshot.clear_error();
        self.snapshot.set_loading(true);

        let deleted = match self.store.delete_price(&user, id).await {
            Ok(deleted) => {
                if deleted {
                    self.snapshot.remove_price(id);
                }
                deleted
            }
            Err(err) => {
                warn!(error = %err, price = %id, "failed to delete price");
                self.snapshot.set_error("Failed to delete price");
                false
            }
        };
        self.snapshot.set_loading(false);
        deleted
    }

    // --- derived views ---

    /// Latest-price comparison for every product with at least one quote.
    ///
    /// Products are fetched first, then each product's quotes, awaited in
    /// order; a store failure mid-way aborts the whole build and resolves
    /// to an empty list with the error recorded.
    pub async fn price_comparisons(&self) -> Vec<PriceComparison> {
        let Some(user) = self.user() else {
            return Vec::new();
        };
        let products = match self.store.list_products(&user).await {
            Ok(products) => products,
            Err(err) => {
                warn!(error = %err, "failed to generate price comparisons");
                self.snapshot.set_error("Failed to generate price comparisons");
                return Vec::new();
            }
        };

        let mut comparisons = Vec::new();
        for product in &products {
            let rows = match self
                .store
                .list_prices(&user, PriceFilter::for_product(product.id().clone()))
                .await
            {
                Ok(rows) => rows,
                Err(err) => {
                    warn!(error = %err, product = %product.id(), "failed to generate price comparisons");
                    self.snapshot.set_error("Failed to generate price comparisons");
                    return Vec::new();
                }
            };
            if let Some(comparison) = build_comparison(product, &rows) {
                comparisons.push(comparison);
            }
        }
        comparisons
    }

    /// One product's quotes shaped for charting, optionally restricted to
    /// a single supplier.
    pub async fn price_history(
        &self,
        product_id: &ProductId,
        supplier_id: Option<&SupplierId>,
    ) -> PriceHistory {
        let Some(user) = self.user() else {
            return PriceHistory::empty();
        };
        let mut filter =
            PriceFilter::for_product(product_id.clone()).with_order(DateOrder::Ascending);
        if let Some(supplier_id) = supplier_id {
            filter = filter.with_supplier(supplier_id.clone());
        }

        match self.store.list_prices(&user, filter).await {
            Ok(rows) => build_history(&rows),
            Err(err) => {
                warn!(error = %err, product = %product_id, "failed to get price history");
                self.snapshot.set_error("Failed to get price history");
                PriceHistory::empty()
            }
        }
    }

    /// Products whose latest-price spread exceeds the configured
    /// threshold, in comparison order.
    pub async fn price_alerts(&self) -> Vec<PriceAlert> {
        let comparisons = self.price_comparisons().await;
        significant_differences(&comparisons, &self.alerts)
    }

    /// Dashboard numbers over the cached snapshot. `today` is supplied by
    /// the caller; it is the core's only wall-clock input.
    #[must_use]
    pub fn stats(&self, today: NaiveDate) -> DashboardStats {
        let prices = self.snapshot.prices();
        let todays_updates = prices.iter().filter(|p| p.price().date() == today).count();
        let recent_prices = prices.iter().take(RECENT_PRICE_LIMIT).cloned().collect();

        DashboardStats {
            supplier_count: self.snapshot.suppliers().len(),
            product_count: self.snapshot.products().len(),
            price_count: prices.len(),
            todays_updates,
            recent_prices,
        }
    }
}
