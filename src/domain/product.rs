//! Product entity and its insert/update payload.

use chrono::{DateTime, Utc};

use crate::error::ValidationError;

use super::id::ProductId;

/// A product the shopkeeper tracks prices for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    id: ProductId,
    name: String,
    category: Option<String>,
    description: Option<String>,
    sku: Option<String>,
    unit: Option<String>,
    created_at: DateTime<Utc>,
}

impl Product {
    /// Create a product from store-owned fields.
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        category: Option<String>,
        description: Option<String>,
        sku: Option<String>,
        unit: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            category,
            description,
            sku,
            unit,
            created_at,
        }
    }

    /// Get the product ID.
    #[must_use]
    pub const fn id(&self) -> &ProductId {
        &self.id
    }

    /// Get the product name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the free-text category, if recorded.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Get the description, if recorded.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Get the SKU, if recorded.
    #[must_use]
    pub fn sku(&self) -> Option<&str> {
        self.sku.as_deref()
    }

    /// Get the purchase unit (e.g. "kg", "case"), if recorded.
    #[must_use]
    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    /// Get the creation timestamp assigned by the store.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Collect the distinct categories seen across products, sorted.
///
/// Absent and blank categories are dropped; the result feeds the
/// user-extensible category picker.
#[must_use]
pub fn distinct_categories(products: &[Product]) -> Vec<String> {
    let mut categories: Vec<String> = products
        .iter()
        .filter_map(|p| p.category())
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect();
    categories.sort();
    categories.dedup();
    categories
}

/// Payload for creating or replacing a product.
#[derive(Debug, Clone, Default)]
pub struct ProductDraft {
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub unit: Option<String>,
}

impl ProductDraft {
    /// Create a draft with the given name and no optional fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Check required fields before any store round-trip.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyField`] when the name is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyField { field: "name" });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str, category: Option<&str>) -> Product {
        Product::new(
            ProductId::from(name),
            name,
            category.map(str::to_string),
            None,
            None,
            None,
            Utc::now(),
        )
    }

    #[test]
    fn draft_rejects_empty_name() {
        assert!(ProductDraft::new(" ").validate().is_err());
        assert!(ProductDraft::new("Flour").validate().is_ok());
    }

    #[test]
    fn distinct_categories_sorts_and_dedupes() {
        let products = vec![
            product("Flour", Some("Baking")),
            product("Sugar", Some("Baking")),
            product("Apples", Some("Produce")),
        ];

        assert_eq!(distinct_categories(&products), vec!["Baking", "Produce"]);
    }

    #[test]
    fn distinct_categories_drops_absent_and_blank() {
        let products = vec![
            product("Flour", None),
            product("Sugar", Some("")),
            product("Apples", Some("Produce")),
        ];

        assert_eq!(distinct_categories(&products), vec!["Produce"]);
    }

    #[test]
    fn distinct_categories_empty_for_no_products() {
        assert!(distinct_categories(&[]).is_empty());
    }
}
