use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, error, warn};

use crate::domain::document::{Collection, Document};
use crate::domain::ports::DocumentSource;
use crate::error::StoreError;

/// A collection file that exists but could not be read back as an array
/// of documents. The collection is served as empty instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadCorruption {
    pub collection: &'static str,
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct LoadOutcome {
    pub documents: Vec<Document>,
    pub recovered: Option<ReadCorruption>,
}

/// One directory, one JSON array file per collection. Every save rewrites
/// the whole file in place.
#[derive(Debug, Clone)]
pub struct DataStore {
    root: PathBuf,
}

impl DataStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, collection: Collection) -> PathBuf {
        self.root.join(collection.file_name())
    }

    async fn ensure_dir(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.root).await
    }

    pub async fn load(&self, collection: Collection) -> LoadOutcome {
        if let Err(e) = self.ensure_dir().await {
            warn!("Could not create data directory {}: {}", self.root.display(), e);
        }

        let path = self.path_for(collection);
        let raw = match fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return LoadOutcome::default(),
            Err(e) => return self.recover(collection, path, e.to_string()),
        };

        if raw.is_empty() {
            return LoadOutcome::default();
        }

        match serde_json::from_str::<Vec<Document>>(&raw) {
            Ok(documents) => LoadOutcome { documents, recovered: None },
            Err(e) => self.recover(collection, path, e.to_string()),
        }
    }

    fn recover(&self, collection: Collection, path: PathBuf, reason: String) -> LoadOutcome {
        warn!(
            collection = collection.name(),
            path = %path.display(),
            "Collection file is unreadable, serving it as empty: {}",
            reason
        );
        LoadOutcome {
            documents: Vec::new(),
            recovered: Some(ReadCorruption {
                collection: collection.name(),
                path,
                reason,
            }),
        }
    }

    pub async fn save(&self, collection: Collection, documents: &[Document]) -> Result<(), StoreError> {
        let write_err = |source| StoreError::Write {
            collection: collection.name(),
            source,
        };

        self.ensure_dir().await.map_err(write_err)?;

        let body = serde_json::to_string_pretty(documents)?;
        let path = self.path_for(collection);

        fs::write(&path, body).await.map_err(|e| {
            error!("Failed to write {}: {:?}", path.display(), e);
            write_err(e)
        })?;

        debug!(collection = collection.name(), count = documents.len(), "Collection persisted");
        Ok(())
    }
}

#[async_trait]
impl DocumentSource for DataStore {
    async fn load_documents(&self, collection: Collection) -> Vec<Document> {
        self.load(collection).await.documents
    }
}
