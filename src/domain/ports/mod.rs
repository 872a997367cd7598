use crate::domain::document::{Changes, Collection, Document};
use crate::domain::query::ResultSet;
use crate::error::StoreError;
use async_trait::async_trait;

/// Read access to whole collections, used to resolve references.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn load_documents(&self, collection: Collection) -> Vec<Document>;
}

#[async_trait]
pub trait DocumentRepository: Send + Sync {
    fn collection(&self) -> Collection;
    async fn create(&self, candidate: Document) -> Result<Document, StoreError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Document>, StoreError>;
    async fn update(&self, id: &str, changes: Changes) -> Result<Option<Document>, StoreError>;
    async fn delete(&self, id: &str) -> Result<Option<Document>, StoreError>;
    async fn list(&self) -> Result<ResultSet, StoreError>;
}

#[async_trait]
pub trait UserRepository: DocumentRepository {
    fn documents(&self) -> &dyn DocumentRepository;
    async fn find_by_email(&self, email: &str) -> Result<Option<Document>, StoreError>;
}

#[async_trait]
pub trait ActivityRepository: DocumentRepository {
    fn documents(&self) -> &dyn DocumentRepository;
    async fn clear(&self) -> Result<(), StoreError>;
}
