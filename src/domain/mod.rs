pub mod document;
pub mod models;
pub mod ports;
pub mod query;
pub mod services;
