use thiserror::Error;

/// Storage definition and construction errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// The factory was given an unusable module name.
    #[error("Invalid module name: {0}")]
    InvalidModuleName(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Failure reported by the external storage client, passed through
    /// unchanged with its source preserved.
    #[error("Backend error: {0}")]
    Backend(#[from] object_store::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
