//! The base configuration every overlay ultimately reads through to.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use toml::Value;

use crate::error::Result;
use crate::traits::SettingsSource;

/// Well-known setting names.
pub mod keys {
    /// Storage spec for the tier that receives every write.
    pub const PRIMARY_STORAGE: &str = "primary_storage";
    /// Storage spec for the read-fallback tier.
    pub const SECONDARY_STORAGE: &str = "secondary_storage";
    /// Whether reads fall back to the secondary tier at all.
    pub const ENABLE_CASCADE: &str = "enable_cascade";
    /// Whether `delete` on a secondary-origin handle really deletes.
    pub const ALLOW_SECONDARY_FILE_DELETION: &str = "allow_secondary_file_deletion";
    /// Root directory for filesystem-backed adapters.
    pub const ROOT: &str = "root";
    /// Directory (relative to `root`) objects are stored under.
    pub const STORE_DIR: &str = "store_dir";
    /// Public host prefix used when building URLs.
    pub const ASSET_HOST: &str = "asset_host";
    /// Bucket name reported by the in-memory adapter.
    pub const MEMORY_BUCKET: &str = "memory_bucket";
}

/// Concrete settings backed by a sorted map.
///
/// [`Settings::new`] seeds the cascade defaults; [`Settings::empty`] does
/// not. Values loaded from TOML replace the defaults key by key.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    values: BTreeMap<String, Value>,
}

impl Settings {
    /// Settings holding only the built-in defaults.
    pub fn new() -> Self {
        let mut settings = Self::empty();
        settings
            .set(keys::ENABLE_CASCADE, true)
            .set(keys::ALLOW_SECONDARY_FILE_DELETION, false)
            .set(keys::ROOT, ".")
            .set(keys::STORE_DIR, "uploads");
        settings
    }

    /// Settings with no values at all.
    pub fn empty() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Parse a TOML document on top of the defaults.
    pub fn from_toml_str(document: &str) -> Result<Self> {
        let table: toml::Table = toml::from_str(document)?;
        let mut settings = Self::new();
        settings.values.extend(table);
        Ok(settings)
    }

    /// Read and parse a TOML settings file.
    pub fn load(path: &Path) -> Result<Self> {
        let document = std::fs::read_to_string(path)?;
        let settings = Self::from_toml_str(&document)?;
        tracing::debug!(path = %path.display(), keys = settings.len(), "loaded settings");
        Ok(settings)
    }

    /// Set a value, replacing any previous one.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Builder-style variant of [`set`](Self::set).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Names of every defined setting, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Number of defined settings.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no settings are defined.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Move into a shared handle suitable as an overlay base.
    pub fn into_shared(self) -> Arc<dyn SettingsSource> {
        Arc::new(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsSource for Settings {
    fn lookup(&self, name: &str) -> Option<Value> {
        self.values.get(name).cloned()
    }
}
