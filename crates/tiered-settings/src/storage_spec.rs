//! Storage specs: which engine a tier runs and which settings it overrides.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use toml::Value;

use crate::error::{Result, SettingsError};
use crate::overlay::SettingsOverlay;
use crate::traits::SettingsSource;

/// Key inside a table spec naming the engine.
pub const ENGINE_KEY: &str = "storage";

/// How one storage tier is configured.
///
/// In TOML a spec is either a bare engine name or a table:
///
/// ```toml
/// secondary_storage = "file"
/// primary_storage = { storage = "file", store_dir = "override" }
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum StorageSpec {
    /// Run `engine` against the cascade's own settings.
    Engine(String),
    /// Run `engine` against an overlay of the cascade's settings.
    ///
    /// `overrides` holds every entry of the table, `storage` included.
    Override {
        engine: String,
        overrides: BTreeMap<String, Value>,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSpec {
    Engine(String),
    Table(BTreeMap<String, Value>),
}

impl StorageSpec {
    /// Interpret a raw setting value as a spec. `name` is used in errors.
    pub fn from_value(name: &str, value: Value) -> Result<Self> {
        let invalid = |reason: String| SettingsError::InvalidStorageSpec {
            name: name.to_string(),
            reason,
        };
        let found = value.type_str();
        let raw: RawSpec = value
            .try_into()
            .map_err(|_| invalid(format!("expected engine name or table, found {found}")))?;

        match raw {
            RawSpec::Engine(engine) if engine.is_empty() => {
                Err(invalid("engine name is empty".into()))
            }
            RawSpec::Engine(engine) => Ok(Self::Engine(engine)),
            RawSpec::Table(overrides) => {
                let engine = match overrides.get(ENGINE_KEY) {
                    Some(Value::String(engine)) if !engine.is_empty() => engine.clone(),
                    Some(_) => return Err(invalid(format!("`{ENGINE_KEY}` must be an engine name"))),
                    None => return Err(invalid(format!("table is missing `{ENGINE_KEY}`"))),
                };
                Ok(Self::Override { engine, overrides })
            }
        }
    }

    /// Read the spec stored under `name` in `settings`.
    pub fn read(settings: &dyn SettingsSource, name: &str) -> Result<Self> {
        Self::from_value(name, settings.get(name)?)
    }

    /// The engine name to resolve in an adapter registry.
    pub fn engine(&self) -> &str {
        match self {
            Self::Engine(engine) | Self::Override { engine, .. } => engine,
        }
    }

    /// Whether this spec carries overrides.
    pub fn is_override(&self) -> bool {
        matches!(self, Self::Override { .. })
    }

    /// The settings an adapter for this tier should be built against.
    ///
    /// A plain engine spec shares `base` as-is; an override spec wraps it in
    /// a [`SettingsOverlay`].
    pub fn effective_settings(&self, base: &Arc<dyn SettingsSource>) -> Arc<dyn SettingsSource> {
        match self {
            Self::Engine(_) => Arc::clone(base),
            Self::Override { overrides, .. } => Arc::new(SettingsOverlay::new(
                Arc::clone(base),
                overrides.iter().map(|(k, v)| (k.clone(), v.clone())),
            )),
        }
    }
}

impl fmt::Display for StorageSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Engine(engine) => write!(f, "{engine}"),
            Self::Override { engine, overrides } => {
                write!(f, "{engine} (")?;
                let mut first = true;
                for (key, value) in overrides.iter().filter(|(k, _)| *k != ENGINE_KEY) {
                    if !first {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key} = {value}")?;
                    first = false;
                }
                write!(f, ")")
            }
        }
    }
}
