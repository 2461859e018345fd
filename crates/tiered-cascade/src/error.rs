//! Error types for cascade construction.
//!
//! Only construction can fail with a [`CascadeError`]. Once built, a cascade
//! returns adapter errors ([`tiered_store::StoreError`]) unchanged.

use thiserror::Error;
use tiered_settings::SettingsError;
use tiered_store::StoreError;

/// Errors raised while building a cascade from settings.
#[derive(Debug, Error)]
pub enum CascadeError {
    /// A tier names an engine the registry does not know.
    #[error("{tier}: unknown storage engine: {name}")]
    UnknownEngine { tier: &'static str, name: String },

    /// A storage spec or cascade flag is missing or malformed.
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),

    /// The engine was found but its constructor failed.
    #[error("{tier}: adapter construction failed: {source}")]
    Adapter {
        tier: &'static str,
        #[source]
        source: StoreError,
    },
}

/// Convenience type alias for cascade construction.
pub type Result<T> = std::result::Result<T, CascadeError>;
