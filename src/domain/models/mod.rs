pub mod product;
pub mod reference;
pub mod stock_transaction;
pub mod supplier;
pub mod timestamp;
pub mod user;
pub mod user_activity;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::domain::document::{Changes, Collection, Document};
use crate::domain::ports::DocumentRepository;
use crate::domain::query::{PopulateField, ResultSet};
use crate::error::StoreError;
use crate::state::StoreState;

pub use reference::Reference;

/// Driver-style document object backed by one collection.
///
/// Instances are built from plain documents and written back with `save`;
/// the associated functions proxy straight to the collection repository.
#[async_trait]
pub trait Model: Serialize + DeserializeOwned + Send + Sync + Sized + 'static {
    const COLLECTION: Collection;
    /// Reference fields written back as plain ids on save.
    const REFERENCES: &'static [PopulateField] = &[];

    fn id(&self) -> Option<&str>;

    fn repository(db: &StoreState) -> &dyn DocumentRepository {
        db.repository(Self::COLLECTION)
    }

    fn from_document(doc: Document) -> Result<Self, StoreError> {
        serde_json::from_value(Value::Object(doc))
            .map_err(|e| StoreError::InvalidDocument(format!("{}: {}", Self::COLLECTION.name(), e)))
    }

    fn to_document(&self) -> Result<Document, StoreError> {
        let mut doc = match serde_json::to_value(self)? {
            Value::Object(doc) => doc,
            other => {
                return Err(StoreError::InvalidDocument(format!(
                    "{} serialized to a non-object: {}",
                    Self::COLLECTION.name(),
                    other
                )))
            }
        };
        for field in Self::REFERENCES {
            reference::collapse(&mut doc, field.field_name());
        }
        Ok(doc)
    }

    /// Creates the document when it has no `_id` yet, updates it otherwise,
    /// then reloads every field from the stored result.
    ///
    /// Returns `false` when the document had an `_id` that no longer exists;
    /// the instance is left untouched in that case.
    async fn save(&mut self, db: &StoreState) -> Result<bool, StoreError> {
        let doc = self.to_document()?;
        let repo = Self::repository(db);

        let stored = match self.id().map(str::to_string) {
            Some(id) => {
                let stored = repo.update(&id, Changes::from(doc)).await?;
                if stored.is_none() {
                    warn!(collection = Self::COLLECTION.name(), id = %id, "Save target no longer exists");
                }
                stored
            }
            None => Some(repo.create(doc).await?),
        };

        match stored {
            Some(doc) => {
                *self = Self::from_document(doc)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn create(db: &StoreState, candidate: Document) -> Result<Self, StoreError> {
        let stored = Self::repository(db).create(candidate).await?;
        Self::from_document(stored)
    }

    async fn find(db: &StoreState) -> Result<ResultSet, StoreError> {
        Self::repository(db).list().await
    }

    async fn find_by_id(db: &StoreState, id: &str) -> Result<Option<Self>, StoreError> {
        Self::repository(db)
            .find_by_id(id)
            .await?
            .map(Self::from_document)
            .transpose()
    }

    async fn find_by_id_and_update(db: &StoreState, id: &str, changes: Changes) -> Result<Option<Self>, StoreError> {
        Self::repository(db)
            .update(id, changes)
            .await?
            .map(Self::from_document)
            .transpose()
    }

    async fn find_by_id_and_delete(db: &StoreState, id: &str) -> Result<Option<Self>, StoreError> {
        Self::repository(db)
            .delete(id)
            .await?
            .map(Self::from_document)
            .transpose()
    }
}

impl<T: Model> Reference<T> {
    pub fn id(&self) -> Option<&str> {
        match self {
            Reference::Id(id) => Some(id),
            Reference::Populated(doc) => doc.id(),
        }
    }
}

/// One-hop resolution of a single reference. A dangling id is kept as is.
pub(crate) async fn resolve<T: Model>(
    db: &StoreState,
    field: PopulateField,
    reference: &mut Reference<T>,
) -> Result<(), StoreError> {
    let Reference::Id(id) = reference else {
        return Ok(());
    };
    if id.is_empty() {
        return Ok(());
    }

    let found = db.repository(field.target()).find_by_id(id).await?;
    if let Some(found) = found {
        let Value::Object(embedded) = field.embed(found) else {
            return Ok(());
        };
        *reference = Reference::Populated(Box::new(T::from_document(embedded)?));
    }
    Ok(())
}
