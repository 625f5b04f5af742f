//! Price quote entity, its insert/update payload, and the joined row shape.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::error::ValidationError;

use super::id::{PriceId, ProductId, SupplierId};
use super::product::Product;
use super::supplier::Supplier;

/// One quote: a supplier's stated price for a product on a calendar date.
///
/// The date carries no time component. The core does not reject future
/// dates; form layers may.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Price {
    id: PriceId,
    price: Decimal,
    date: NaiveDate,
    notes: Option<String>,
    product_id: ProductId,
    supplier_id: SupplierId,
    created_at: DateTime<Utc>,
}

impl Price {
    /// Create a price record from store-owned fields.
    pub fn new(
        id: PriceId,
        price: Decimal,
        date: NaiveDate,
        notes: Option<String>,
        product_id: ProductId,
        supplier_id: SupplierId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            price,
            date,
            notes,
            product_id,
            supplier_id,
            created_at,
        }
    }

    /// Get the price record ID.
    #[must_use]
    pub const fn id(&self) -> &PriceId {
        &self.id
    }

    /// Get the quoted amount.
    #[must_use]
    pub const fn price(&self) -> Decimal {
        self.price
    }

    /// Get the quote date.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// Get free-form notes, if recorded.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Get the quoted product's ID.
    #[must_use]
    pub const fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    /// Get the quoting supplier's ID.
    #[must_use]
    pub const fn supplier_id(&self) -> &SupplierId {
        &self.supplier_id
    }

    /// Get the creation timestamp assigned by the store.
    ///
    /// Breaks ordering ties between quotes sharing a date.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// A price row joined with its referenced product and supplier.
///
/// Assembled by the record store's join query; the composite shape keeps
/// the joined details explicit instead of dynamically extending the row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceWithDetails {
    price: Price,
    product: Product,
    supplier: Supplier,
}

impl PriceWithDetails {
    /// Assemble a joined row.
    #[must_use]
    pub fn new(price: Price, product: Product, supplier: Supplier) -> Self {
        Self {
            price,
            product,
            supplier,
        }
    }

    /// Get the price record.
    #[must_use]
    pub const fn price(&self) -> &Price {
        &self.price
    }

    /// Get the joined product detail.
    #[must_use]
    pub const fn product(&self) -> &Product {
        &self.product
    }

    /// Get the joined supplier detail.
    #[must_use]
    pub const fn supplier(&self) -> &Supplier {
        &self.supplier
    }
}

/// Payload for creating or replacing a price quote.
#[derive(Debug, Clone)]
pub struct PriceDraft {
    pub price: Decimal,
    pub date: NaiveDate,
    pub notes: Option<String>,
    pub product_id: ProductId,
    pub supplier_id: SupplierId,
}

impl PriceDraft {
    /// Create a draft quote with no notes.
    #[must_use]
    pub fn new(
        product_id: ProductId,
        supplier_id: SupplierId,
        price: Decimal,
        date: NaiveDate,
    ) -> Self {
        Self {
            price,
            date,
            notes: None,
            product_id,
            supplier_id,
        }
    }

    /// Check invariants before any store round-trip.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NonPositivePrice`] when the amount is
    /// zero or negative.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.price <= Decimal::ZERO {
            return Err(ValidationError::NonPositivePrice { price: self.price });
        }
        Ok(())
    }
}
