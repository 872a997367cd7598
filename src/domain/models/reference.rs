use serde::{Deserialize, Serialize};

use crate::domain::document::{document_id, Document};

/// A soft reference to a document in another collection: the raw id as
/// stored, or the referenced document once populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reference<T> {
    Id(String),
    Populated(Box<T>),
}

impl<T> Reference<T> {
    pub fn is_populated(&self) -> bool {
        matches!(self, Reference::Populated(_))
    }

    pub fn populated(&self) -> Option<&T> {
        match self {
            Reference::Populated(doc) => Some(doc),
            Reference::Id(_) => None,
        }
    }

    pub fn as_id(&self) -> Option<&str> {
        match self {
            Reference::Id(id) => Some(id),
            Reference::Populated(_) => None,
        }
    }
}

impl<T> From<String> for Reference<T> {
    fn from(id: String) -> Self {
        Reference::Id(id)
    }
}

impl<T> From<&str> for Reference<T> {
    fn from(id: &str) -> Self {
        Reference::Id(id.to_string())
    }
}

/// Replaces an embedded document in `field` by its `_id`, so populated
/// references are persisted as plain ids again.
pub fn collapse(doc: &mut Document, field: &str) {
    let embedded_id = doc
        .get(field)
        .and_then(|v| v.as_object())
        .and_then(|embedded| document_id(embedded).map(str::to_string));

    if let Some(id) = embedded_id {
        doc.insert(field.to_string(), id.into());
    }
}
