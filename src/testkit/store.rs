//! In-memory [`RecordStore`] with the same ordering and scoping
//! contract as the REST adapter.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use uuid::Uuid;

use crate::domain::{
    Price, PriceDraft, PriceId, PriceWithDetails, Product, ProductDraft, ProductId, Supplier,
    SupplierDraft, SupplierId, UserId,
};
use crate::error::{Result, StoreError};
use crate::port::store::{DateOrder, PriceFilter, RecordStore};

fn optional(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Default)]
struct State {
    suppliers: Vec<(UserId, Supplier)>,
    products: Vec<(UserId, Product)>,
    prices: Vec<(UserId, Price)>,
    // Monotonic creation clock so ties are reproducible.
    seq: i64,
    failing: bool,
}

impl State {
    fn next_created_at(&mut self) -> DateTime<Utc> {
        self.seq += 1;
        DateTime::<Utc>::from_timestamp(self.seq, 0).expect("sequence timestamp in range")
    }
}

/// In-memory record store for tests.
///
/// Assigns UUIDv4 ids and a deterministic creation sequence. Deleting a
/// supplier or product cascade-deletes its dependent price rows, the
/// referential policy the hosted store is expected to enforce. Clones
/// share one backing state, so a test can keep a handle while the
/// service owns another.
#[derive(Clone)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
        }
    }

    /// Make every subsequent operation fail with a backend error, or
    /// restore normal behavior.
    pub fn set_failing(&self, failing: bool) {
        self.state.lock().failing = failing;
    }

    fn check_failing(state: &State) -> Result<()> {
        if state.failing {
            return Err(StoreError::Backend {
                status: 500,
                message: "injected failure".to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn join(state: &State, user: &UserId, price: &Price) -> Result<PriceWithDetails> {
        let product = state
            .products
            .iter()
            .find(|(owner, p)| owner == user && p.id() == price.product_id())
            .map(|(_, p)| p.clone())
            .ok_or_else(|| StoreError::MissingJoin {
                entity: "products",
                price_id: price.id().to_string(),
            })?;
        let supplier = state
            .suppliers
            .iter()
            .find(|(owner, s)| owner == user && s.id() == price.supplier_id())
            .map(|(_, s)| s.clone())
            .ok_or_else(|| StoreError::MissingJoin {
                entity: "suppliers",
                price_id: price.id().to_string(),
            })?;
        Ok(PriceWithDetails::new(price.clone(), product, supplier))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for MemoryStore {
    async fn list_suppliers(&self, user: &UserId) -> Result<Vec<Supplier>> {
        let state = self.state.lock();
        Self::check_failing(&state)?;
        let mut rows: Vec<Supplier> = state
            .suppliers
            .iter()
            .filter(|(owner, _)| owner == user)
            .map(|(_, s)| s.clone())
            .collect();
        rows.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(rows)
    }

    async fn get_supplier(&self, user: &UserId, id: &SupplierId) -> Result<Option<Supplier>> {
        let state = self.state.lock();
        Self::check_failing(&state)?;
        Ok(state
            .suppliers
            .iter()
            .find(|(owner, s)| owner == user && s.id() == id)
            .map(|(_, s)| s.clone()))
    }

    async fn insert_supplier(&self, user: &UserId, draft: SupplierDraft) -> Result<Supplier> {
        let mut state = self.state.lock();
        Self::check_failing(&state)?;
        let created_at = state.next_created_at();
        let supplier = Supplier::new(
            SupplierId::new(Uuid::new_v4().to_string()),
            draft.name,
            optional(draft.contact),
            optional(draft.phone),
            optional(draft.address),
            optional(draft.notes),
            created_at,
        );
        state.suppliers.push((user.clone(), supplier.clone()));
        Ok(supplier)
    }

    async fn update_supplier(
        &self,
        user: &UserId,
        id: &SupplierId,
        draft: SupplierDraft,
    ) -> Result<Supplier> {
        let mut state = self.state.lock();
        Self::check_failing(&state)?;
        let slot = state
            .suppliers
            .iter_mut()
            .find(|(owner, s)| owner == user && s.id() == id)
            .ok_or_else(|| StoreError::MissingRow {
                entity: "suppliers",
                id: id.to_string(),
            })?;
        let updated = Supplier::new(
            id.clone(),
            draft.name,
            optional(draft.contact),
            optional(draft.phone),
            optional(draft.address),
            optional(draft.notes),
            slot.1.created_at(),
        );
        slot.1 = updated.clone();
        Ok(updated)
    }

    async fn delete_supplier(&self, user: &UserId, id: &SupplierId) -> Result<bool> {
        let mut state = self.state.lock();
        Self::check_failing(&state)?;
        let before = state.suppliers.len();
        state
            .suppliers
            .retain(|(owner, s)| !(owner == user && s.id() == id));
        let deleted = state.suppliers.len() != before;
        if deleted {
            state
                .prices
                .retain(|(owner, p)| !(owner == user && p.supplier_id() == id));
        }
        Ok(deleted)
    }

    async fn list_products(&self, user: &UserId) -> Result<Vec<Product>> {
        let state = self.state.lock();
        Self::check_failing(&state)?;
        let mut rows: Vec<Product> = state
            .products
            .iter()
            .filter(|(owner, _)| owner == user)
            .map(|(_, p)| p.clone())
            .collect();
        rows.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(rows)
    }

    async fn get_product(&self, user: &UserId, id: &ProductId) -> Result<Option<Product>> {
        let state = self.state.lock();
        Self::check_failing(&state)?;
        Ok(state
            .products
            .iter()
            .find(|(owner, p)| owner == user && p.id() == id)
            .map(|(_, p)| p.clone()))
    }

    async fn insert_product(&self, user: &UserId, draft: ProductDraft) -> Result<Product> {
        let mut state = self.state.lock();
        Self::check_failing(&state)?;
        let created_at = state.next_created_at();
        let product = Product::new(
            ProductId::new(Uuid::new_v4().to_string()),
            draft.name,
            optional(draft.category),
            optional(draft.description),
            optional(draft.sku),
            optional(draft.unit),
            created_at,
        );
        state.products.push((user.clone(), product.clone()));
        Ok(product)
    }

    async fn update_product(
        &self,
        user: &UserId,
        id: &ProductId,
        draft: ProductDraft,
    ) -> Result<Product> {
        let mut state = self.state.lock();
        Self::check_failing(&state)?;
        let slot = state
            .products
            .iter_mut()
            .find(|(owner, p)| owner == user && p.id() == id)
            .ok_or_else(|| StoreError::MissingRow {
                entity: "products",
                id: id.to_string(),
            })?;
        let updated = Product::new(
            id.clone(),
            draft.name,
            optional(draft.category),
            optional(draft.description),
            optional(draft.sku),
            optional(draft.unit),
            slot.1.created_at(),
        );
        slot.1 = updated.clone();
        Ok(updated)
    }

    async fn delete_product(&self, user: &UserId, id: &ProductId) -> Result<bool> {
        let mut state = self.state.lock();
        Self::check_failing(&state)?;
        let before = state.products.len();
        state
            .products
            .retain(|(owner, p)| !(owner == user && p.id() == id));
        let deleted = state.products.len() != before;
        if deleted {
            state
                .prices
                .retain(|(owner, p)| !(owner == user && p.product_id() == id));
        }
        Ok(deleted)
    }

    async fn list_prices(&self, user: &UserId, filter: PriceFilter) -> Result<Vec<PriceWithDetails>> {
        let state = self.state.lock();
        Self::check_failing(&state)?;
        let mut rows: Vec<&Price> = state
            .prices
            .iter()
            .filter(|(owner, _)| owner == user)
            .map(|(_, p)| p)
            .filter(|p| {
                filter
                    .product_id
                    .as_ref()
                    .map_or(true, |id| p.product_id() == id)
            })
            .filter(|p| {
                filter
                    .supplier_id
                    .as_ref()
                    .map_or(true, |id| p.supplier_id() == id)
            })
            .collect();

        rows.sort_by(|a, b| {
            let key_a = (a.date(), a.created_at(), a.id().as_str());
            let key_b = (b.date(), b.created_at(), b.id().as_str());
            match filter.order {
                DateOrder::Ascending => key_a.cmp(&key_b),
                DateOrder::Descending => key_b.cmp(&key_a),
            }
        });

        rows.into_iter()
            .map(|price| Self::join(&state, user, price))
            .collect()
    }

    async fn get_price(&self, user: &UserId, id: &PriceId) -> Result<Option<PriceWithDetails>> {
        let state = self.state.lock();
        Self::check_failing(&state)?;
        state
            .prices
            .iter()
            .find(|(owner, p)| owner == user && p.id() == id)
            .map(|(_, p)| Self::join(&state, user, p))
            .transpose()
    }

    async fn insert_price(&self, user: &UserId, draft: PriceDraft) -> Result<Price> {
        let mut state = self.state.lock();
        Self::check_failing(&state)?;
        if !state
            .products
            .iter()
            .any(|(owner, p)| owner == user && p.id() == &draft.product_id)
        {
            return Err(StoreError::MissingRow {
                entity: "products",
                id: draft.product_id.to_string(),
            }
            .into());
        }
        if !state
            .suppliers
            .iter()
            .any(|(owner, s)| owner == user && s.id() == &draft.supplier_id)
        {
            return Err(StoreError::MissingRow {
                entity: "suppliers",
                id: draft.supplier_id.to_string(),
            }
            .into());
        }

        let created_at = state.next_created_at();
        let price = Price::new(
            PriceId::new(Uuid::new_v4().to_string()),
            draft.price,
            draft.date,
            optional(draft.notes),
            draft.product_id,
            draft.supplier_id,
            created_at,
        );
        state.prices.push((user.clone(), price.clone()));
        Ok(price)
    }

    async fn update_price(&self, user: &UserId, id: &PriceId, draft: PriceDraft) -> Result<Price> {
        let mut state = self.state.lock();
        Self::check_failing(&state)?;
        let index = state
            .prices
            .iter()
            .position(|(owner, p)| owner == user && p.id() == id)
            .ok_or_else(|| StoreError::MissingRow {
                entity: "prices",
                id: id.to_string(),
            })?;

        let updated = Price::new(
            id.clone(),
            draft.price,
            draft.date,
            optional(draft.notes),
            draft.product_id,
            draft.supplier_id,
            state.prices[index].1.created_at(),
        );
        state.prices[index].1 = updated.clone();
        Ok(updated)
    }

    async fn delete_price(&self, user: &UserId, id: &PriceId) -> Result<bool> {
        let mut state = self.state.lock();
        Self::check_failing(&state)?;
        let before = state.prices.len();
        state
            .prices
            .retain(|(owner, p)| !(owner == user && p.id() == id));
        Ok(state.prices.len() != before)
    }
}
