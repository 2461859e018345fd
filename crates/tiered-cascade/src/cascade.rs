use std::sync::Arc;

use tracing::{debug, info};

use tiered_settings::{keys, SettingsSource, StorageSpec};
use tiered_store::{AdapterRegistry, Payload, StorageAdapter, StoreError, StoreResult, StoredFile};

use crate::error::{CascadeError, Result};
use crate::file::{CascadeFile, SecondaryFile};

/// Engine name a cascade reports when used as an adapter itself.
pub const CASCADE_ENGINE: &str = "cascade";

/// Flags controlling fallback reads and secondary deletion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CascadePolicy {
    /// Fall back to the secondary tier when the primary lacks an object.
    pub enabled: bool,
    /// Let `delete` on a secondary-origin handle reach the secondary tier.
    pub allow_secondary_deletion: bool,
}

impl Default for CascadePolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            allow_secondary_deletion: false,
        }
    }
}

impl CascadePolicy {
    /// Read `enable_cascade` (default `true`) and
    /// `allow_secondary_file_deletion` (honored only when exactly `true`).
    pub fn from_settings(settings: &dyn SettingsSource) -> Result<Self> {
        Ok(Self {
            enabled: settings.bool_or(keys::ENABLE_CASCADE, true)?,
            allow_secondary_deletion: settings.is_true(keys::ALLOW_SECONDARY_FILE_DELETION),
        })
    }
}

/// Two-tier storage: writes go to the primary tier, reads fall back to the
/// secondary tier when the primary lacks the object.
///
/// The cascade exclusively owns both adapters. It adds no locking, retries
/// or error interpretation of its own: adapter failures reach the caller
/// unchanged, and only an explicit existence check on the primary handle
/// triggers a fallback.
#[derive(Debug)]
pub struct Cascade {
    settings: Arc<dyn SettingsSource>,
    primary: Box<dyn StorageAdapter>,
    secondary: Box<dyn StorageAdapter>,
    policy: CascadePolicy,
}

impl Cascade {
    /// Compose a cascade from already-built adapters.
    ///
    /// The cascade reports the primary adapter's settings as its own.
    pub fn new(
        primary: Box<dyn StorageAdapter>,
        secondary: Box<dyn StorageAdapter>,
        policy: CascadePolicy,
    ) -> Self {
        Self {
            settings: Arc::clone(primary.settings()),
            primary,
            secondary,
            policy,
        }
    }

    /// Build both tiers from `primary_storage` / `secondary_storage` in
    /// `settings`, resolving engine names through `registry`.
    ///
    /// Each spec is either an engine name (the adapter shares `settings`) or
    /// a table with a `storage` key (the adapter gets an overlay of
    /// `settings` with the table's entries on top). The policy flags are
    /// read from `settings` itself, never from an overlay.
    pub fn from_settings(
        settings: Arc<dyn SettingsSource>,
        registry: &AdapterRegistry,
    ) -> Result<Self> {
        let policy = CascadePolicy::from_settings(settings.as_ref())?;
        let primary = build_tier(&settings, registry, keys::PRIMARY_STORAGE)?;
        let secondary = build_tier(&settings, registry, keys::SECONDARY_STORAGE)?;
        info!(
            primary = primary.engine(),
            secondary = secondary.engine(),
            enabled = policy.enabled,
            allow_secondary_deletion = policy.allow_secondary_deletion,
            "cascade ready"
        );
        Ok(Self {
            settings,
            primary,
            secondary,
            policy,
        })
    }

    pub fn primary(&self) -> &dyn StorageAdapter {
        self.primary.as_ref()
    }

    pub fn secondary(&self) -> &dyn StorageAdapter {
        self.secondary.as_ref()
    }

    pub fn policy(&self) -> CascadePolicy {
        self.policy
    }

    /// Store `payload` in the primary tier. The secondary tier is never
    /// written.
    pub fn store(&self, payload: &Payload, location: &str) -> StoreResult<Box<dyn StoredFile>> {
        debug!(location, engine = self.primary.engine(), "cascade store");
        self.primary.store(payload, location)
    }

    /// Retrieve a handle for `location`.
    ///
    /// Returns the primary handle when cascading is disabled or when it
    /// reports that the object exists. Otherwise returns the secondary
    /// tier's handle wrapped in a [`SecondaryFile`], without checking
    /// whether the secondary object exists.
    pub fn retrieve(&self, location: &str) -> StoreResult<CascadeFile> {
        let primary = self.primary.retrieve(location)?;
        if !self.policy.enabled || primary.exists()? {
            return Ok(CascadeFile::Primary(primary));
        }

        debug!(location, engine = self.secondary.engine(), "falling back to secondary");
        let secondary = self.secondary.retrieve(location)?;
        Ok(CascadeFile::Secondary(SecondaryFile::new(
            secondary,
            self.policy.allow_secondary_deletion,
        )))
    }
}

impl StorageAdapter for Cascade {
    fn engine(&self) -> &str {
        CASCADE_ENGINE
    }

    fn settings(&self) -> &Arc<dyn SettingsSource> {
        &self.settings
    }

    fn store(&self, payload: &Payload, location: &str) -> StoreResult<Box<dyn StoredFile>> {
        self.primary.store(payload, location)
    }

    fn retrieve(&self, location: &str) -> StoreResult<Box<dyn StoredFile>> {
        Ok(Box::new(Cascade::retrieve(self, location)?))
    }
}

fn build_tier(
    settings: &Arc<dyn SettingsSource>,
    registry: &AdapterRegistry,
    tier: &'static str,
) -> Result<Box<dyn StorageAdapter>> {
    let spec = StorageSpec::read(settings.as_ref(), tier)?;
    let effective = spec.effective_settings(settings);
    debug!(tier, spec = %spec, "building storage tier");
    registry
        .build(spec.engine(), effective)
        .map_err(|e| match e {
            StoreError::UnknownEngine { name } => CascadeError::UnknownEngine { tier, name },
            source => CascadeError::Adapter { tier, source },
        })
}
