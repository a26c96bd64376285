use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

/// Failures from either persistence backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Errors surfaced to the presentation layer.
#[derive(Debug, Error)]
pub enum AppError {
    /// The stored document could not be read; render a generic error page.
    #[error("Failed to load financial data for {identity}: {source}")]
    LoadFailed {
        identity: String,
        #[source]
        source: StoreError,
    },

    #[error("Failed to save financial data for {identity}: {source}")]
    SaveFailed {
        identity: String,
        #[source]
        source: StoreError,
    },

    #[error("No entry at index {index} in {list}")]
    NotFound { list: String, index: usize },

    #[error("Unknown list: {0}")]
    UnknownList(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
