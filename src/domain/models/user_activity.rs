use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::document::{Collection, Document};
use crate::domain::models::{resolve, timestamp, user::User, Model, Reference};
use crate::domain::query::PopulateField;
use crate::error::StoreError;
use crate::state::StoreState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActivityType {
    Login,
    Logout,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserActivity {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub user_id: Reference<User>,
    #[serde(default)]
    pub user_name: String,
    #[serde(rename = "type")]
    pub kind: ActivityType,
    #[serde(default, with = "timestamp::option")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "timestamp::option")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Document,
}

impl UserActivity {
    pub fn new(user_id: impl Into<String>, user_name: impl Into<String>, kind: ActivityType) -> Self {
        Self {
            id: None,
            user_id: Reference::Id(user_id.into()),
            user_name: user_name.into(),
            kind,
            timestamp: None,
            created_at: None,
            updated_at: None,
            extra: Document::new(),
        }
    }

    /// Appends a login/logout entry for a stored user.
    pub async fn record(db: &StoreState, user: &User, kind: ActivityType) -> Result<UserActivity, StoreError> {
        let user_id = user
            .id()
            .ok_or_else(|| StoreError::InvalidDocument("activity for a user without _id".into()))?;
        let mut activity = UserActivity::new(user_id, user.name.clone(), kind);
        activity.save(db).await?;
        Ok(activity)
    }

    /// Empties the activity log.
    pub async fn delete_many(db: &StoreState) -> Result<(), StoreError> {
        db.activity_repo.clear().await
    }

    /// Only `userId` resolves on an activity. The embedded user carries no
    /// password.
    pub async fn populate(&mut self, db: &StoreState, field: &str) -> Result<&mut Self, StoreError> {
        if field.parse::<PopulateField>() == Ok(PopulateField::UserId) {
            resolve(db, PopulateField::UserId, &mut self.user_id).await?;
        }
        Ok(self)
    }
}

impl Model for UserActivity {
    const COLLECTION: Collection = Collection::Activities;
    const REFERENCES: &'static [PopulateField] = &[PopulateField::UserId];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}
