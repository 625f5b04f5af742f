//! Wire rows for the REST record store.
//!
//! Response rows normalize empty strings to `None` on their way into the
//! domain, so "no value" has exactly one representation past this layer.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{
    Price, PriceDraft, PriceId, PriceWithDetails, Product, ProductDraft, ProductId, Supplier,
    SupplierDraft, SupplierId, UserId,
};
use crate::error::StoreError;

fn optional(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Deserialize)]
pub(super) struct SupplierRow {
    id: String,
    created_at: DateTime<Utc>,
    name: String,
    contact: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    notes: Option<String>,
}

impl SupplierRow {
    pub(super) fn into_domain(self) -> Supplier {
        Supplier::new(
            SupplierId::new(self.id),
            self.name,
            optional(self.contact),
            optional(self.phone),
            optional(self.address),
            optional(self.notes),
            self.created_at,
        )
    }
}

#[derive(Debug, Serialize)]
pub(super) struct SupplierFields<'a> {
    name: &'a str,
    contact: Option<&'a str>,
    phone: Option<&'a str>,
    address: Option<&'a str>,
    notes: Option<&'a str>,
}

impl<'a> SupplierFields<'a> {
    pub(super) fn from_draft(draft: &'a SupplierDraft) -> Self {
        Self {
            name: &draft.name,
            contact: draft.contact.as_deref(),
            phone: draft.phone.as_deref(),
            address: draft.address.as_deref(),
            notes: draft.notes.as_deref(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct SupplierInsert<'a> {
    #[serde(flatten)]
    fields: SupplierFields<'a>,
    user_id: &'a str,
}

impl<'a> SupplierInsert<'a> {
    pub(super) fn new(draft: &'a SupplierDraft, user: &'a UserId) -> Self {
        Self {
            fields: SupplierFields::from_draft(draft),
            user_id: user.as_str(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ProductRow {
    id: String,
    created_at: DateTime<Utc>,
    name: String,
    category: Option<String>,
    description: Option<String>,
    sku: Option<String>,
    unit: Option<String>,
}

impl ProductRow {
    pub(super) fn into_domain(self) -> Product {
        Product::new(
            ProductId::new(self.id),
            self.name,
            optional(self.category),
            optional(self.description),
            optional(self.sku),
            optional(self.unit),
            self.created_at,
        )
    }
}

#[derive(Debug, Serialize)]
pub(super) struct ProductFields<'a> {
    name: &'a str,
    category: Option<&'a str>,
    description: Option<&'a str>,
    sku: Option<&'a str>,
    unit: Option<&'a str>,
}

impl<'a> ProductFields<'a> {
    pub(super) fn from_draft(draft: &'a ProductDraft) -> Self {
        Self {
            name: &draft.name,
            category: draft.category.as_deref(),
            description: draft.description.as_deref(),
            sku: draft.sku.as_deref(),
            unit: draft.unit.as_deref(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct ProductInsert<'a> {
    #[serde(flatten)]
    fields: ProductFields<'a>,
    user_id: &'a str,
}

impl<'a> ProductInsert<'a> {
    pub(super) fn new(draft: &'a ProductDraft, user: &'a UserId) -> Self {
        Self {
            fields: ProductFields::from_draft(draft),
            user_id: user.as_str(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct PriceRow {
    id: String,
    created_at: DateTime<Utc>,
    price: Decimal,
    date: NaiveDate,
    notes: Option<String>,
    product_id: String,
    supplier_id: String,
    // Embedded join aliases; absent on plain (non-joined) selects.
    #[serde(default)]
    product: Option<ProductRow>,
    #[serde(default)]
    supplier: Option<SupplierRow>,
}

impl PriceRow {
    pub(super) fn into_price(self) -> Price {
        Price::new(
            PriceId::new(self.id),
            self.price,
            self.date,
            optional(self.notes),
            ProductId::new(self.product_id),
            SupplierId::new(self.supplier_id),
            self.created_at,
        )
    }

    /// Split out the embedded product/supplier details.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MissingJoin`] when an embed is absent, which
    /// means the query did not request it or referential integrity broke.
    pub(super) fn into_joined(self) -> Result<PriceWithDetails, StoreError> {
        let product = self
            .product
            .ok_or_else(|| StoreError::MissingJoin {
                entity: "products",
                price_id: self.id.clone(),
            })?
            .into_domain();
        let supplier = self
            .supplier
            .ok_or_else(|| StoreError::MissingJoin {
                entity: "suppliers",
                price_id: self.id.clone(),
            })?
            .into_domain();

        let price = Price::new(
            PriceId::new(self.id),
            self.price,
            self.date,
            optional(self.notes),
            ProductId::new(self.product_id),
            SupplierId::new(self.supplier_id),
            self.created_at,
        );
        Ok(PriceWithDetails::new(price, product, supplier))
    }
}

#[derive(Debug, Serialize)]
pub(super) struct PriceFields<'a> {
    price: Decimal,
    date: NaiveDate,
    notes: Option<&'a str>,
    product_id: &'a str,
    supplier_id: &'a str,
}

impl<'a> PriceFields<'a> {
    pub(super) fn from_draft(draft: &'a PriceDraft) -> Self {
        Self {
            price: draft.price,
            date: draft.date,
            notes: draft.notes.as_deref(),
            product_id: draft.product_id.as_str(),
            supplier_id: draft.supplier_id.as_str(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct PriceInsert<'a> {
    #[serde(flatten)]
    fields: PriceFields<'a>,
    user_id: &'a str,
}

impl<'a> PriceInsert<'a> {
    pub(super) fn new(draft: &'a PriceDraft, user: &'a UserId) -> Self {
        Self {
            fields: PriceFields::from_draft(draft),
            user_id: user.as_str(),
        }
    }
}
