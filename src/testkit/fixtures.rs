//! Builders for domain primitives used across tests.
//!
//! Concise factory functions so tests focus on assertions rather than
//! construction boilerplate.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::domain::{PriceDraft, ProductDraft, ProductId, SupplierDraft, SupplierId, UserId};

/// Create a [`UserId`] from a string.
#[must_use]
pub fn user(id: &str) -> UserId {
    UserId::from(id)
}

/// Create a supplier draft with only a name.
#[must_use]
pub fn supplier_draft(name: &str) -> SupplierDraft {
    SupplierDraft::new(name)
}

/// Create a product draft with only a name.
#[must_use]
pub fn product_draft(name: &str) -> ProductDraft {
    ProductDraft::new(name)
}

/// Create a product draft with a category.
#[must_use]
pub fn categorized_product_draft(name: &str, category: &str) -> ProductDraft {
    let mut draft = ProductDraft::new(name);
    draft.category = Some(category.to_string());
    draft
}

/// Create a price draft from literal price and `yyyy-MM-dd` date strings.
#[must_use]
pub fn price_draft(
    product_id: &ProductId,
    supplier_id: &SupplierId,
    price: &str,
    date: &str,
) -> PriceDraft {
    let price: Decimal = price.parse().expect("valid price literal");
    let date: NaiveDate = date.parse().expect("valid date literal");
    PriceDraft::new(product_id.clone(), supplier_id.clone(), price, date)
}
