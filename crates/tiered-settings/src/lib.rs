//! Layered settings for tiered storage.
//!
//! Every storage tier reads its configuration through a [`SettingsSource`].
//! The base is a [`Settings`] map (usually parsed from TOML); a tier that
//! needs a different view wraps it in a [`SettingsOverlay`] instead of
//! copying it.
//!
//! # Modules
//!
//! - [`error`] - Error types for lookups and parsing
//! - [`traits`] - The [`SettingsSource`] lookup trait
//! - [`settings`] - The base [`Settings`] map and well-known [`keys`]
//! - [`overlay`] - The read-through [`SettingsOverlay`]
//! - [`storage_spec`] - [`StorageSpec`]: engine name plus optional overrides

pub mod error;
pub mod overlay;
pub mod settings;
pub mod storage_spec;
pub mod traits;

pub use error::{Result, SettingsError};
pub use overlay::SettingsOverlay;
pub use settings::{keys, Settings};
pub use storage_spec::StorageSpec;
pub use traits::SettingsSource;

pub use toml::Value;
