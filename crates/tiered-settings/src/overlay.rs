//! Read-through settings overlay.
//!
//! A [`SettingsOverlay`] layers a fixed map of overrides on top of a shared
//! base source. Lookups consult the overrides first and forward everything
//! else to the base, so a storage tier can run against its own view of the
//! configuration without copying it. An overlay is itself a
//! [`SettingsSource`] and can serve as the base of another overlay.

use std::collections::BTreeMap;
use std::sync::Arc;

use toml::Value;

use crate::traits::SettingsSource;

/// Settings view with per-key overrides over a shared base.
#[derive(Clone, Debug)]
pub struct SettingsOverlay {
    base: Arc<dyn SettingsSource>,
    overrides: BTreeMap<String, Value>,
}

impl SettingsOverlay {
    /// Build an overlay. The override map is fixed from here on.
    pub fn new<I, K>(base: Arc<dyn SettingsSource>, overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self {
            base,
            overrides: overrides.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// The source consulted for any name not overridden here.
    pub fn base(&self) -> &Arc<dyn SettingsSource> {
        &self.base
    }

    /// The override entries, sorted by name.
    pub fn overrides(&self) -> &BTreeMap<String, Value> {
        &self.overrides
    }

    /// Whether this overlay (not its base) defines `name`.
    pub fn is_overridden(&self, name: &str) -> bool {
        self.overrides.contains_key(name)
    }
}

impl SettingsSource for SettingsOverlay {
    fn lookup(&self, name: &str) -> Option<Value> {
        match self.overrides.get(name) {
            Some(value) => Some(value.clone()),
            None => self.base.lookup(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SettingsError;
    use crate::settings::Settings;
    use proptest::prelude::*;

    fn base() -> Arc<dyn SettingsSource> {
        Settings::empty()
            .with("override_me", "original")
            .with("inherit_me", "inherited")
            .into_shared()
    }

    #[test]
    fn override_wins_over_base() {
        let overlay = SettingsOverlay::new(
            base(),
            [("storage", Value::from("fog")), ("override_me", Value::from("overridden"))],
        );
        assert_eq!(overlay.get_str("override_me").unwrap(), "overridden");
        assert!(overlay.is_overridden("override_me"));
    }

    #[test]
    fn missing_override_reads_base() {
        let overlay = SettingsOverlay::new(base(), [("override_me", Value::from("overridden"))]);
        assert_eq!(overlay.get_str("inherit_me").unwrap(), "inherited");
        assert!(!overlay.is_overridden("inherit_me"));
    }

    #[test]
    fn unknown_setting_error_comes_from_base() {
        let overlay = SettingsOverlay::new(base(), [("override_me", Value::from("x"))]);
        let err = overlay.get("never_defined").unwrap_err();
        assert!(matches!(err, SettingsError::UnknownSetting { .. }));
    }

    #[test]
    fn overlays_on_same_base_are_independent() {
        let shared = base();
        let a = SettingsOverlay::new(shared.clone(), [("override_me", Value::from("a"))]);
        let b = SettingsOverlay::new(shared.clone(), [("override_me", Value::from("b"))]);
        assert_eq!(a.get_str("override_me").unwrap(), "a");
        assert_eq!(b.get_str("override_me").unwrap(), "b");
        assert_eq!(shared.get_str("override_me").unwrap(), "original");
    }

    #[test]
    fn overlay_can_be_wrapped_again() {
        let inner: Arc<dyn SettingsSource> = Arc::new(SettingsOverlay::new(
            base(),
            [("override_me", Value::from("inner"))],
        ));
        let outer = SettingsOverlay::new(inner, [("inherit_me", Value::from("outer"))]);
        assert_eq!(outer.get_str("override_me").unwrap(), "inner");
        assert_eq!(outer.get_str("inherit_me").unwrap(), "outer");
    }

    #[test]
    fn typed_accessors_see_overrides() {
        let overlay = SettingsOverlay::new(
            Settings::new().into_shared(),
            [("enable_cascade", Value::from(false))],
        );
        assert!(!overlay.get_bool("enable_cascade").unwrap());
        assert_eq!(overlay.get_str("store_dir").unwrap(), "uploads");
    }

    proptest! {
        #[test]
        fn lookup_prefers_overrides(
            base_map in proptest::collection::btree_map("[a-d]{1,2}", "[a-z]{0,4}", 0..8),
            over_map in proptest::collection::btree_map("[a-d]{1,2}", "[a-z]{0,4}", 0..8),
            probe in "[a-d]{1,2}",
        ) {
            let mut base = Settings::empty();
            for (k, v) in &base_map {
                base.set(k.clone(), v.clone());
            }
            let overlay = SettingsOverlay::new(
                base.into_shared(),
                over_map.iter().map(|(k, v)| (k.clone(), Value::from(v.clone()))),
            );
            let expected = over_map.get(&probe).or_else(|| base_map.get(&probe));
            let found = overlay.lookup(&probe);
            prop_assert_eq!(found.as_ref().and_then(Value::as_str), expected.map(String::as_str));
        }
    }
}
