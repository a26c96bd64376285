// Library root - exports for the binary and integration tests

pub mod config;
pub mod database;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod services;
pub mod utils;

pub use config::Config;
pub use errors::{AppError, StoreError};

use services::store::RecordStore;
use std::sync::Arc;

/// Everything a request needs, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub store: RecordStore,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn from_config(config: Config) -> anyhow::Result<Self> {
        let store = RecordStore::from_config(&config).await?;
        Ok(Self {
            store,
            config: Arc::new(config),
        })
    }
}
