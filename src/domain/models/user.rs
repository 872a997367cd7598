use std::future::{Future, IntoFuture};
use std::pin::Pin;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::document::{Collection, Document};
use crate::domain::models::{timestamp, Model};
use crate::domain::services::password::verify_password;
use crate::error::StoreError;
use crate::state::StoreState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    #[default]
    Staff,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Staff => "STAFF",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserStatus {
    Online,
    #[default]
    Offline,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Online => "ONLINE",
            UserStatus::Offline => "OFFLINE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    /// Stored hash. Never serialized back, so a `save` only ever sends a
    /// clear-text password that was staged with `set_password`.
    #[serde(default, skip_serializing)]
    password: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub is_premium: bool,
    #[serde(default)]
    pub status: UserStatus,
    #[serde(default, with = "timestamp::option")]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "timestamp::option")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Document,
    #[serde(skip)]
    pending_password: Option<String>,
}

impl User {
    pub fn new(name: impl Into<String>, email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            email: email.into(),
            password: None,
            role: Role::default(),
            is_premium: false,
            status: UserStatus::default(),
            last_login: None,
            created_at: None,
            updated_at: None,
            extra: Document::new(),
            pending_password: Some(password.into()),
        }
    }

    /// Stages a clear-text password; the next `save` stores only its hash.
    pub fn set_password(&mut self, plain: impl Into<String>) {
        self.pending_password = Some(plain.into());
    }

    pub fn has_password(&self) -> bool {
        self.password.is_some() || self.pending_password.is_some()
    }

    pub async fn compare_password(&self, candidate: &str) -> Result<bool, StoreError> {
        match &self.password {
            Some(hash) => verify_password(candidate.to_string(), hash.clone()).await,
            None => Ok(false),
        }
    }

    /// Shallow copy without the password field. Apply before a user leaves
    /// the trust boundary.
    pub fn to_object(&self) -> Result<Document, StoreError> {
        let mut doc = self.to_document()?;
        doc.remove("password");
        Ok(doc)
    }

    pub async fn find_by_email(db: &StoreState, email: &str) -> Result<Option<User>, StoreError> {
        db.user_repo
            .find_by_email(email)
            .await?
            .map(User::from_document)
            .transpose()
    }

    /// Lookup by email, awaited directly or after a `max_time_ms` call.
    pub fn find_one<'a>(db: &'a StoreState, email: impl Into<String>) -> FindOne<'a> {
        FindOne {
            db,
            email: email.into(),
        }
    }
}

impl Model for User {
    const COLLECTION: Collection = Collection::Users;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn to_document(&self) -> Result<Document, StoreError> {
        let mut doc = match serde_json::to_value(self)? {
            Value::Object(doc) => doc,
            _ => return Err(StoreError::InvalidDocument("user serialized to a non-object".into())),
        };
        if let Some(plain) = &self.pending_password {
            doc.insert("password".into(), Value::String(plain.clone()));
        }
        Ok(doc)
    }
}

pub struct FindOne<'a> {
    db: &'a StoreState,
    email: String,
}

impl<'a> FindOne<'a> {
    /// Accepted for call-site compatibility; lookups are local and carry no
    /// deadline.
    pub fn max_time_ms(self, _ms: u64) -> Self {
        self
    }
}

impl<'a> IntoFuture for FindOne<'a> {
    type Output = Result<Option<User>, StoreError>;
    type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send + 'a>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(async move { User::find_by_email(self.db, &self.email).await })
    }
}
