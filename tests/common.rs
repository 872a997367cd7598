#![allow(dead_code)]

use inventory_store::config::Config;
use inventory_store::state::StoreState;
use inventory_store::{open, Document};
use serde_json::Value;
use tempfile::TempDir;

pub struct TestStore {
    pub db: StoreState,
    pub dir: TempDir,
}

impl TestStore {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db = open(&Config::new(dir.path().join("data")));
        Self { db, dir }
    }

    /// A second handle over the same directory, as a restarted process
    /// would see it.
    pub fn reopen(&self) -> StoreState {
        open(&self.db.config)
    }
}

pub fn doc(value: Value) -> Document {
    value.as_object().cloned().expect("document literal must be an object")
}
