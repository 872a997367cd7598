use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::document::{Collection, Document};
use crate::domain::models::{product::Product, resolve, timestamp, Model, Reference};
use crate::domain::query::PopulateField;
use crate::error::StoreError;
use crate::state::StoreState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    In,
    Out,
}

impl TransactionType {
    /// Signed effect of `quantity` on a product's stock.
    pub fn stock_delta(&self, quantity: i64) -> i64 {
        match self {
            TransactionType::In => quantity,
            TransactionType::Out => -quantity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockTransaction {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub product_id: Reference<Product>,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default, with = "timestamp::option")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "timestamp::option")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Document,
}

impl StockTransaction {
    pub fn new(product_id: impl Into<String>, kind: TransactionType, quantity: i64) -> Self {
        Self {
            id: None,
            product_id: Reference::Id(product_id.into()),
            kind,
            quantity,
            date: Some(Utc::now()),
            notes: None,
            created_at: None,
            updated_at: None,
            extra: Document::new(),
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Only `productId` resolves on a transaction; other names are ignored.
    pub async fn populate(&mut self, db: &StoreState, field: &str) -> Result<&mut Self, StoreError> {
        if field.parse::<PopulateField>() == Ok(PopulateField::ProductId) {
            resolve(db, PopulateField::ProductId, &mut self.product_id).await?;
        }
        Ok(self)
    }
}

impl Model for StockTransaction {
    const COLLECTION: Collection = Collection::StockTransactions;
    const REFERENCES: &'static [PopulateField] = &[PopulateField::ProductId];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}
