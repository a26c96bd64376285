use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::services::cache::DEFAULT_CACHE_TTL_SECS;

/// Where financial documents live. Chosen once at startup.
#[derive(Clone, Debug, PartialEq)]
pub enum StorageBackend {
    Json { data_dir: PathBuf },
    Postgres { database_url: String },
}

#[derive(Clone, Debug)]
pub struct Config {
    pub storage: StorageBackend,
    pub cache_ttl: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        // Pooled URL first, matching hosted Postgres providers.
        let database_url = env::var("POSTGRES_PRISMA_URL")
            .or_else(|_| env::var("POSTGRES_URL"))
            .ok()
            .filter(|url| !url.trim().is_empty());

        let storage = match database_url {
            Some(database_url) => StorageBackend::Postgres { database_url },
            None => StorageBackend::Json {
                data_dir: env::var("DATA_DIR")
                    .unwrap_or_else(|_| "data".to_string())
                    .into(),
            },
        };

        let cache_ttl_secs = env::var("CACHE_TTL_SECS")
            .unwrap_or_else(|_| DEFAULT_CACHE_TTL_SECS.to_string())
            .parse()
            .unwrap_or(DEFAULT_CACHE_TTL_SECS);

        Ok(Self {
            storage,
            cache_ttl: Duration::from_secs(cache_ttl_secs),
        })
    }

    /// JSON-file storage rooted at `data_dir`, for tests and local runs.
    pub fn json(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            storage: StorageBackend::Json {
                data_dir: data_dir.into(),
            },
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        }
    }
}
