pub mod file_store;
pub mod id;

pub use file_store::{DataStore, LoadOutcome, ReadCorruption};
pub use id::new_id;
