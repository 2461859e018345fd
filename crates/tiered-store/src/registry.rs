//! Name-to-constructor registry for storage adapters.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tiered_settings::SettingsSource;

use crate::error::{StoreError, StoreResult};
use crate::file::{FileAdapter, FILE_ENGINE};
use crate::memory::{MemoryAdapter, MEMORY_ENGINE};
use crate::traits::StorageAdapter;

/// Builds an adapter bound to the given settings.
pub type AdapterFactory =
    Arc<dyn Fn(Arc<dyn SettingsSource>) -> StoreResult<Box<dyn StorageAdapter>> + Send + Sync>;

/// Maps engine names to adapter constructors.
///
/// Populated once at startup; looking up an unregistered name is a
/// configuration error ([`StoreError::UnknownEngine`]).
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    factories: BTreeMap<String, AdapterFactory>,
}

impl AdapterRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the `file` and `memory` engines.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry
            .register(FILE_ENGINE, |settings| {
                Ok(Box::new(FileAdapter::new(settings)?) as Box<dyn StorageAdapter>)
            })
            .register(MEMORY_ENGINE, |settings| {
                Ok(Box::new(MemoryAdapter::new(settings)?) as Box<dyn StorageAdapter>)
            });
        registry
    }

    /// Register (or replace) the constructor for `name`.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(Arc<dyn SettingsSource>) -> StoreResult<Box<dyn StorageAdapter>>
            + Send
            + Sync
            + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
        self
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered engine names, sorted.
    pub fn engines(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    /// Construct the adapter registered as `name` against `settings`.
    pub fn build(
        &self,
        name: &str,
        settings: Arc<dyn SettingsSource>,
    ) -> StoreResult<Box<dyn StorageAdapter>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| StoreError::UnknownEngine {
                name: name.to_string(),
            })?;
        let adapter = factory(settings)?;
        tracing::debug!(engine = name, "constructed storage adapter");
        Ok(adapter)
    }
}

impl fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("engines", &self.engines())
            .finish()
    }
}
