//! Error types for settings lookups and parsing.

use thiserror::Error;

/// Errors raised while reading or parsing settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// No source in the chain defines this setting.
    #[error("unknown setting: {name}")]
    UnknownSetting { name: String },

    /// The setting exists but holds a value of the wrong type.
    #[error("setting {name} must be a {expected}, found {found}")]
    InvalidType {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A storage spec is neither an engine name nor a table with a `storage` key.
    #[error("invalid storage spec for {name}: {reason}")]
    InvalidStorageSpec { name: String, reason: String },

    /// The settings document is not valid TOML.
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// I/O error while reading a settings file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;
