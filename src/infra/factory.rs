use std::sync::Arc;

use tracing::info;

use crate::config::Config;
use crate::domain::document::Collection;
use crate::infra::repositories::{
    json_activity_repo::JsonActivityRepo, json_document_repo::JsonDocumentRepo,
    json_user_repo::JsonUserRepo,
};
use crate::infra::storage::DataStore;
use crate::state::StoreState;

pub fn bootstrap_state(config: &Config) -> StoreState {
    info!("Opening file-backed store at {}", config.data_dir.display());

    let data = Arc::new(DataStore::new(config.data_dir.clone()));

    StoreState {
        config: config.clone(),
        user_repo: Arc::new(JsonUserRepo::new(data.clone())),
        product_repo: Arc::new(JsonDocumentRepo::new(data.clone(), Collection::Products)),
        supplier_repo: Arc::new(JsonDocumentRepo::new(data.clone(), Collection::Suppliers)),
        stock_repo: Arc::new(JsonDocumentRepo::new(data.clone(), Collection::StockTransactions)),
        activity_repo: Arc::new(JsonActivityRepo::new(data.clone())),
        data,
    }
}
