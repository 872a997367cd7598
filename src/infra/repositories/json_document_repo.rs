use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tracing::info;

use crate::domain::document::{
    document_id, format_timestamp, next_update_stamp, Changes, Collection, Document,
    CREATED_AT_FIELD, ID_FIELD, UPDATED_AT_FIELD,
};
use crate::domain::ports::{DocumentRepository, DocumentSource};
use crate::domain::query::ResultSet;
use crate::error::StoreError;
use crate::infra::storage::{new_id, DataStore};

/// Whole-collection read-modify-write over one collection file.
///
/// Each operation reloads the file first, so sequential callers see their
/// own writes. Nothing serializes two interleaved operations on the same
/// collection: the later save wins.
pub struct JsonDocumentRepo {
    store: Arc<DataStore>,
    collection: Collection,
}

impl JsonDocumentRepo {
    pub fn new(store: Arc<DataStore>, collection: Collection) -> Self {
        Self { store, collection }
    }

    pub async fn load(&self) -> Vec<Document> {
        self.store.load(self.collection).await.documents
    }

    pub async fn persist(&self, documents: &[Document]) -> Result<(), StoreError> {
        self.store.save(self.collection, documents).await
    }

    /// Stamps identity and timestamps onto `candidate`, appends it to the
    /// already loaded `documents` and rewrites the collection.
    pub async fn append(&self, mut documents: Vec<Document>, candidate: Document) -> Result<Document, StoreError> {
        let now = format_timestamp(Utc::now());
        let mut doc = Document::new();
        doc.insert(ID_FIELD.to_string(), Value::String(new_id()));
        for (field, value) in candidate {
            if field != ID_FIELD {
                doc.insert(field, value);
            }
        }
        doc.insert(CREATED_AT_FIELD.to_string(), Value::String(now.clone()));
        doc.insert(UPDATED_AT_FIELD.to_string(), Value::String(now));

        documents.push(doc.clone());
        self.persist(&documents).await?;

        info!(
            collection = self.collection.name(),
            id = document_id(&doc).unwrap_or_default(),
            "Document created"
        );
        Ok(doc)
    }

    pub async fn find_one_by(&self, field: &str, value: &Value) -> Option<Document> {
        self.load().await.into_iter().find(|doc| doc.get(field) == Some(value))
    }

    pub async fn clear(&self) -> Result<(), StoreError> {
        self.persist(&[]).await?;
        info!(collection = self.collection.name(), "Collection cleared");
        Ok(())
    }

    fn source(&self) -> Arc<dyn DocumentSource> {
        self.store.clone()
    }
}

fn position_of(documents: &[Document], id: &str) -> Option<usize> {
    documents.iter().position(|doc| document_id(doc) == Some(id))
}

#[async_trait]
impl DocumentRepository for JsonDocumentRepo {
    fn collection(&self) -> Collection {
        self.collection
    }

    async fn create(&self, candidate: Document) -> Result<Document, StoreError> {
        let documents = self.load().await;
        self.append(documents, candidate).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Document>, StoreError> {
        Ok(self.load().await.into_iter().find(|doc| document_id(doc) == Some(id)))
    }

    async fn update(&self, id: &str, changes: Changes) -> Result<Option<Document>, StoreError> {
        let mut documents = self.load().await;
        let Some(idx) = position_of(&documents, id) else {
            return Ok(None);
        };

        let doc = &mut documents[idx];
        let stamp = next_update_stamp(doc.get(UPDATED_AT_FIELD), Utc::now());
        changes.merge_into(doc);
        doc.insert(UPDATED_AT_FIELD.to_string(), Value::String(stamp));

        let updated = doc.clone();
        self.persist(&documents).await?;
        Ok(Some(updated))
    }

    async fn delete(&self, id: &str) -> Result<Option<Document>, StoreError> {
        let mut documents = self.load().await;
        let Some(idx) = position_of(&documents, id) else {
            return Ok(None);
        };

        let removed = documents.remove(idx);
        self.persist(&documents).await?;

        info!(collection = self.collection.name(), id = id, "Document deleted");
        Ok(Some(removed))
    }

    async fn list(&self) -> Result<ResultSet, StoreError> {
        Ok(ResultSet::new(self.load().await, self.source()))
    }
}
