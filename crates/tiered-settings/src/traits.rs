//! The [`SettingsSource`] trait every configuration view implements.

use std::fmt;
use std::sync::Arc;

use toml::Value;

use crate::error::{Result, SettingsError};

/// A read-only view over named settings.
///
/// Only [`lookup`](SettingsSource::lookup) is required; the typed accessors
/// are built on top of it. The set of names is open-ended: sources never
/// enumerate a fixed schema, and an absent name is reported as `None`
/// rather than an error until a caller asks for it with [`get`].
///
/// [`get`]: SettingsSource::get
pub trait SettingsSource: Send + Sync + fmt::Debug {
    /// Look up a setting by name. Returns `None` if no value is defined.
    fn lookup(&self, name: &str) -> Option<Value>;

    /// Look up a setting that must exist.
    fn get(&self, name: &str) -> Result<Value> {
        self.lookup(name)
            .ok_or_else(|| SettingsError::UnknownSetting {
                name: name.to_string(),
            })
    }

    /// Read a required string setting.
    fn get_str(&self, name: &str) -> Result<String> {
        match self.get(name)? {
            Value::String(s) => Ok(s),
            other => Err(invalid_type(name, "string", &other)),
        }
    }

    /// Read a required boolean setting.
    fn get_bool(&self, name: &str) -> Result<bool> {
        match self.get(name)? {
            Value::Boolean(b) => Ok(b),
            other => Err(invalid_type(name, "boolean", &other)),
        }
    }

    /// Read a string setting, falling back to `default` when it is absent.
    fn str_or(&self, name: &str, default: &str) -> Result<String> {
        match self.lookup(name) {
            None => Ok(default.to_string()),
            Some(Value::String(s)) => Ok(s),
            Some(other) => Err(invalid_type(name, "string", &other)),
        }
    }

    /// Read a boolean setting, falling back to `default` when it is absent.
    fn bool_or(&self, name: &str, default: bool) -> Result<bool> {
        match self.lookup(name) {
            None => Ok(default),
            Some(Value::Boolean(b)) => Ok(b),
            Some(other) => Err(invalid_type(name, "boolean", &other)),
        }
    }

    /// `true` only when the setting is present and is exactly the boolean `true`.
    fn is_true(&self, name: &str) -> bool {
        matches!(self.lookup(name), Some(Value::Boolean(true)))
    }
}

impl<T: SettingsSource + ?Sized> SettingsSource for Arc<T> {
    fn lookup(&self, name: &str) -> Option<Value> {
        (**self).lookup(name)
    }
}

impl<T: SettingsSource + ?Sized> SettingsSource for &T {
    fn lookup(&self, name: &str) -> Option<Value> {
        (**self).lookup(name)
    }
}

fn invalid_type(name: &str, expected: &'static str, found: &Value) -> SettingsError {
    SettingsError::InvalidType {
        name: name.to_string(),
        expected,
        found: found.type_str(),
    }
}
