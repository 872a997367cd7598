use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use crate::domain::document::{Changes, Collection, Document};
use crate::domain::models::user::{Role, UserStatus};
use crate::domain::ports::{DocumentRepository, UserRepository};
use crate::domain::query::ResultSet;
use crate::domain::services::password::hash_password;
use crate::error::StoreError;
use crate::infra::repositories::json_document_repo::JsonDocumentRepo;
use crate::infra::storage::DataStore;

pub struct JsonUserRepo {
    inner: JsonDocumentRepo,
}

impl JsonUserRepo {
    pub fn new(store: Arc<DataStore>) -> Self {
        Self {
            inner: JsonDocumentRepo::new(store, Collection::Users),
        }
    }
}

fn field_or(candidate: &Document, field: &str, default: Value) -> Value {
    candidate.get(field).cloned().unwrap_or(default)
}

/// The stored shape of a user: known fields only, with defaults applied.
async fn normalize(candidate: Document) -> Result<Document, StoreError> {
    let mut user = Document::new();
    for field in ["name", "email"] {
        if let Some(value) = candidate.get(field) {
            user.insert(field.into(), value.clone());
        }
    }

    if let Some(Value::String(plain)) = candidate.get("password") {
        user.insert("password".into(), Value::String(hash_password(plain.clone()).await?));
    }

    user.insert("role".into(), field_or(&candidate, "role", Value::String(Role::Staff.as_str().into())));
    let is_premium = candidate.get("isPremium").map(truthy).unwrap_or(false);
    user.insert("isPremium".into(), Value::Bool(is_premium));
    user.insert(
        "status".into(),
        field_or(&candidate, "status", Value::String(UserStatus::Offline.as_str().into())),
    );
    user.insert("lastLogin".into(), field_or(&candidate, "lastLogin", Value::Null));
    Ok(user)
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[async_trait]
impl DocumentRepository for JsonUserRepo {
    fn collection(&self) -> Collection {
        Collection::Users
    }

    async fn create(&self, candidate: Document) -> Result<Document, StoreError> {
        let users = self.inner.load().await;
        let email = candidate.get("email").cloned().unwrap_or(Value::Null);

        if users.iter().any(|u| u.get("email").unwrap_or(&Value::Null) == &email) {
            warn!("Rejected duplicate user email: {}", email);
            return Err(StoreError::DuplicateKey {
                collection: Collection::Users.name(),
                field: "email",
                value: email.as_str().unwrap_or_default().to_string(),
            });
        }

        let user = normalize(candidate).await?;
        self.inner.append(users, user).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Document>, StoreError> {
        self.inner.find_by_id(id).await
    }

    /// A `password` in `changes` is always clear text and is hashed before
    /// it is merged.
    async fn update(&self, id: &str, changes: Changes) -> Result<Option<Document>, StoreError> {
        let pending = match changes.get("password") {
            Some(Value::String(plain)) => Some(plain.clone()),
            _ => None,
        };
        let changes = match pending {
            Some(plain) => changes.set("password", hash_password(plain).await?),
            None => changes,
        };
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
impl UserRepository for JsonUserRepo {
    fn documents(&self) -> &dyn DocumentRepository {
        self
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Document>, StoreError> {
        Ok(self.inner.find_one_by("email", &Value::String(email.to_string())).await)
    }
}
