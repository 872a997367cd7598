pub mod config;
pub mod domain;
pub mod error;
pub mod infra;
pub mod state;

use crate::config::Config;
use crate::infra::factory::bootstrap_state;
use crate::state::StoreState;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub use crate::domain::document::{Changes, Collection, Document};
pub use crate::domain::models::{
    product::Product,
    stock_transaction::{StockTransaction, TransactionType},
    supplier::Supplier,
    user::{Role, User, UserStatus},
    user_activity::{ActivityType, UserActivity},
    Model, Reference,
};
pub use crate::domain::query::{PopulateField, Projection, ResultSet, SortOrder};
pub use crate::error::StoreError;

const LOG_FILE_PREFIX: &str = "inventory-store.log";

/// Pretty output on stdout (`RUST_LOG`, default `info`) plus a daily JSON
/// file under `config.log_dir` that keeps this crate's debug events.
pub fn init_logging(config: &Config) -> WorkerGuard {
    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(&config.log_dir, LOG_FILE_PREFIX));

    let stdout_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file_filter = EnvFilter::new(format!("info,{}=debug", env!("CARGO_CRATE_NAME")));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().pretty().with_target(false).with_filter(stdout_filter))
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_target(true)
                .with_writer(file_writer)
                .with_filter(file_filter),
        )
        .init();

    info!(
        log_dir = %config.log_dir.display(),
        data_dir = %config.data_dir.display(),
        "Logging initialized"
    );
    guard
}

/// Opens a store handle over `config.data_dir`. Nothing touches the disk
/// until the first operation.
pub fn open(config: &Config) -> StoreState {
    bootstrap_state(config)
}
