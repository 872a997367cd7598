use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::document::{Collection, Document};
use crate::domain::models::{resolve, supplier::Supplier, timestamp, Model, Reference};
use crate::domain::query::PopulateField;
use crate::error::StoreError;
use crate::state::StoreState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    /// Kept non-negative by callers; the store does not check it.
    #[serde(default)]
    pub current_stock: i64,
    /// Written as `null` when cleared so that `save` removes a stored value.
    #[serde(default)]
    pub supplier_id: Option<Reference<Supplier>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "timestamp::option")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Document,
}

impl Product {
    pub fn new(name: impl Into<String>, current_stock: i64) -> Self {
        Self {
            id: None,
            name: name.into(),
            current_stock,
            supplier_id: None,
            created_at: None,
            updated_at: None,
            extra: Document::new(),
        }
    }

    pub fn with_supplier(mut self, supplier_id: impl Into<String>) -> Self {
        self.supplier_id = Some(Reference::Id(supplier_id.into()));
        self
    }

    /// Only `supplierId` resolves on a product; other names are ignored.
    pub async fn populate(&mut self, db: &StoreState, field: &str) -> Result<&mut Self, StoreError> {
        if field.parse::<PopulateField>() == Ok(PopulateField::SupplierId) {
            if let Some(reference) = self.supplier_id.as_mut() {
                resolve(db, PopulateField::SupplierId, reference).await?;
            }
        }
        Ok(self)
    }
}

impl Model for Product {
    const COLLECTION: Collection = Collection::Products;
    const REFERENCES: &'static [PopulateField] = &[PopulateField::SupplierId];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}
