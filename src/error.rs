use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Duplicate key in {collection}: {field} = {value}")]
    DuplicateKey {
        collection: &'static str,
        field: &'static str,
        value: String,
    },
    #[error("Failed to write collection {collection}: {source}")]
    Write {
        collection: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
    #[error("Password hashing failed: {0}")]
    PasswordHash(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StoreError {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, StoreError::DuplicateKey { .. })
    }
}
