use std::sync::Arc;

use crate::config::Config;
use crate::domain::document::Collection;
use crate::domain::ports::{ActivityRepository, DocumentRepository, UserRepository};
use crate::infra::storage::DataStore;

/// Explicit handle to one data directory and its five collection
/// repositories. Distinct handles over distinct directories never share
/// state.
#[derive(Clone)]
pub struct StoreState {
    pub config: Config,
    pub data: Arc<DataStore>,
    pub user_repo: Arc<dyn UserRepository>,
    pub product_repo: Arc<dyn DocumentRepository>,
    pub supplier_repo: Arc<dyn DocumentRepository>,
    pub stock_repo: Arc<dyn DocumentRepository>,
    pub activity_repo: Arc<dyn ActivityRepository>,
}

impl StoreState {
    pub fn repository(&self, collection: Collection) -> &dyn DocumentRepository {
        match collection {
            Collection::Users => self.user_repo.documents(),
            Collection::Products => self.product_repo.as_ref(),
            Collection::Suppliers => self.supplier_repo.as_ref(),
            Collection::StockTransactions => self.stock_repo.as_ref(),
            Collection::Activities => self.activity_repo.documents(),
        }
    }
}
