use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;

use crate::domain::document::{format_timestamp, Changes, Collection, Document};
use crate::domain::ports::{ActivityRepository, DocumentRepository};
use crate::domain::query::ResultSet;
use crate::error::StoreError;
use crate::infra::repositories::json_document_repo::JsonDocumentRepo;
use crate::infra::storage::DataStore;

pub struct JsonActivityRepo {
    inner: JsonDocumentRepo,
}

impl JsonActivityRepo {
    pub fn new(store: Arc<DataStore>) -> Self {
        Self {
            inner: JsonDocumentRepo::new(store, Collection::Activities),
        }
    }
}

#[async_trait]
impl DocumentRepository for JsonActivityRepo {
    fn collection(&self) -> Collection {
        Collection::Activities
    }

    async fn create(&self, mut candidate: Document) -> Result<Document, StoreError> {
        let has_timestamp = matches!(candidate.get("timestamp"), Some(v) if !v.is_null());
        if !has_timestamp {
            candidate.insert("timestamp".into(), Value::String(format_timestamp(Utc::now())));
        }
        self.inner.create(candidate).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Document>, StoreError> {
        self.inner.find_by_id(id).await
    }

    async fn update(&self, id: &str, changes: Changes) -> Result<Option<Document>, StoreError> {
        self.inner.update(id, changes).await
    }

    async fn delete(&self, id: &str) -> Result<Option<Document>, StoreError> {
        self.inner.delete(id).await
    }

    async fn list(&self) -> Result<ResultSet, StoreError> {
        self.inner.list().await
    }
}

#[async_trait]
impl ActivityRepository for JsonActivityRepo {
    fn documents(&self) -> &dyn DocumentRepository {
        self
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.inner.clear().await
    }
}
