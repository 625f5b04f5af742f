//! Record store port: user-scoped CRUD and joined price queries.

use std::future::Future;

use crate::domain::{
    Price, PriceDraft, PriceId, PriceWithDetails, Product, ProductDraft, ProductId, Supplier,
    SupplierDraft, SupplierId, UserId,
};
use crate::error::Result;

/// Date ordering for price queries.
///
/// Ties on equal dates are broken by `created_at`, then row id, in the
/// same direction, so result order is deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateOrder {
    Ascending,
    Descending,
}

/// Filter for joined price queries.
#[derive(Debug, Clone)]
pub struct PriceFilter {
    pub product_id: Option<ProductId>,
    pub supplier_id: Option<SupplierId>,
    pub order: DateOrder,
}

impl PriceFilter {
    /// All of the user's prices, most recent first.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            product_id: None,
            supplier_id: None,
            order: DateOrder::Descending,
        }
    }

    /// One product's prices, most recent first.
    #[must_use]
    pub const fn for_product(product_id: ProductId) -> Self {
        Self {
            product_id: Some(product_id),
            supplier_id: None,
            order: DateOrder::Descending,
        }
    }

    /// One supplier's prices, most recent first.
    #[must_use]
    pub const fn for_supplier(supplier_id: SupplierId) -> Self {
        Self {
            product_id: None,
            supplier_id: Some(supplier_id),
            order: DateOrder::Descending,
        }
    }

    /// Restrict to one supplier on top of the current filter.
    #[must_use]
    pub fn with_supplier(mut self, supplier_id: SupplierId) -> Self {
        self.supplier_id = Some(supplier_id);
        self
    }

    /// Override the date ordering.
    #[must_use]
    pub fn with_order(mut self, order: DateOrder) -> Self {
        self.order = order;
        self
    }
}

/// Storage operations over the managed record store.
///
/// Every operation is scoped to the owning user; implementations must
/// never return rows owned by anyone else. The store assigns `id` and
/// `created_at` on insert.
pub trait RecordStore: Send + Sync {
    /// List the user's suppliers ordered by name.
    fn list_suppliers(&self, user: &UserId) -> impl Future<Output = Result<Vec<Supplier>>> + Send;

    /// Get one supplier by ID.
    fn get_supplier(
        &self,
        user: &UserId,
        id: &SupplierId,
    ) -> impl Future<Output = Result<Option<Supplier>>> + Send;

    /// Insert a supplier.
    fn insert_supplier(
        &self,
        user: &UserId,
        draft: SupplierDraft,
    ) -> impl Future<Output = Result<Supplier>> + Send;

    /// Replace a supplier's user-editable fields.
    fn update_supplier(
        &self,
        user: &UserId,
        id: &SupplierId,
        draft: SupplierDraft,
    ) -> impl Future<Output = Result<Supplier>> + Send;

    /// Delete a supplier. Returns whether a row was removed.
    fn delete_supplier(
        &self,
        user: &UserId,
        id: &SupplierId,
    ) -> impl Future<Output = Result<bool>> + Send;

    /// List the user's products ordered by name.
    fn list_products(&self, user: &UserId) -> impl Future<Output = Result<Vec<Product>>> + Send;

    /// Get one product by ID.
    fn get_product(
        &self,
        user: &UserId,
        id: &ProductId,
    ) -> impl Future<Output = Result<Option<Product>>> + Send;

    /// Insert a product.
    fn insert_product(
        &self,
        user: &UserId,
        draft: ProductDraft,
    ) -> impl Future<Output = Result<Product>> + Send;

    /// Replace a product's user-editable fields.
    fn update_product(
        &self,
        user: &UserId,
        id: &ProductId,
        draft: ProductDraft,
    ) -> impl Future<Output = Result<Product>> + Send;

    /// Delete a product. Returns whether a row was removed.
    fn delete_product(
        &self,
        user: &UserId,
        id: &ProductId,
    ) -> impl Future<Output = Result<bool>> + Send;

    /// List joined price rows matching the filter, in the filter's date
    /// order with deterministic tie-breaks.
    fn list_prices(
        &self,
        user: &UserId,
        filter: PriceFilter,
    ) -> impl Future<Output = Result<Vec<PriceWithDetails>>> + Send;

    /// Get one joined price row by ID.
    fn get_price(
        &self,
        user: &UserId,
        id: &PriceId,
    ) -> impl Future<Output = Result<Option<PriceWithDetails>>> + Send;

    /// Insert a price quote.
    fn insert_price(
        &self,
        user: &UserId,
        draft: PriceDraft,
    ) -> impl Future<Output = Result<Price>> + Send;

    /// Replace a price quote's user-editable fields.
    fn update_price(
        &self,
        user: &UserId,
        id: &PriceId,
        draft: PriceDraft,
    ) -> impl Future<Output = Result<Price>> + Send;

    /// Delete a price quote. Returns whether a row was removed.
    fn delete_price(
        &self,
        user: &UserId,
        id: &PriceId,
    ) -> impl Future<Output = Result<bool>> + Send;
}
