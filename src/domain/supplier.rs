//! Supplier entity and its insert/update payload.

use chrono::{DateTime, Utc};

use crate::error::ValidationError;

use super::id::SupplierId;

/// A supplier the shopkeeper buys from.
///
/// Optional contact fields use `None` as the single "no value"
/// representation; store adapters convert empty strings at the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Supplier {
    id: SupplierId,
    name: String,
    contact: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl Supplier {
    /// Create a supplier from store-owned fields.
    pub fn new(
        id: SupplierId,
        name: impl Into<String>,
        contact: Option<String>,
        phone: Option<String>,
        address: Option<String>,
        notes: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            contact,
            phone,
            address,
            notes,
            created_at,
        }
    }

    /// Get the supplier ID.
    #[must_use]
    pub const fn id(&self) -> &SupplierId {
        &self.id
    }

    /// Get the supplier name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the contact person, if recorded.
    #[must_use]
    pub fn contact(&self) -> Option<&str> {
        self.contact.as_deref()
    }

    /// Get the phone number, if recorded.
    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    /// Get the address, if recorded.
    #[must_use]
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    /// Get free-form notes, if recorded.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Get the creation timestamp assigned by the store.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Payload for creating or replacing a supplier.
///
/// The store assigns `id` and `created_at`; updates replace every
/// user-editable field with the payload's values.
#[derive(Debug, Clone, Default)]
pub struct SupplierDraft {
    pub name: String,
    pub contact: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

impl SupplierDraft {
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
