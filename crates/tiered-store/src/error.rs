use tiered_settings::SettingsError;

/// Errors from storage adapter and stored-file operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No object is stored at this location.
    #[error("object not found: {location}")]
    NotFound { location: String },

    /// The location cannot be mapped onto the backing store.
    #[error("invalid location '{location}': {reason}")]
    InvalidLocation { location: String, reason: String },

    /// No adapter is registered under this engine name.
    #[error("unknown storage engine: {name}")]
    UnknownEngine { name: String },

    /// The adapter's settings are missing or malformed.
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Backend-specific failure that is not plain I/O.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
