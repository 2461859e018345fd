//! Two-tier storage cascade.
//!
//! A [`Cascade`] owns a primary and a secondary
//! [`StorageAdapter`](tiered_store::StorageAdapter):
//!
//! - `store` always writes to the primary tier; the secondary is never
//!   written.
//! - `retrieve` asks the primary first. If cascading is disabled, or the
//!   primary handle reports that the object exists, that handle is returned.
//!   Otherwise the secondary tier's handle comes back wrapped in a
//!   [`SecondaryFile`].
//! - A [`SecondaryFile`] forwards everything to the real handle except
//!   `delete`, which is a successful no-op unless
//!   `allow_secondary_file_deletion = true`.
//!
//! Each tier is built from a [`StorageSpec`](tiered_settings::StorageSpec):
//! either an engine name run against the cascade's own settings, or a table
//! of overrides applied through a
//! [`SettingsOverlay`](tiered_settings::SettingsOverlay).
//!
//! No background work, locks or retries are added here; concurrency
//! guarantees are whatever the adapters provide.

pub mod cascade;
pub mod error;
pub mod file;

#[cfg(test)]
mod testutil;

pub use cascade::{Cascade, CascadePolicy, CASCADE_ENGINE};
pub use error::{CascadeError, Result};
pub use file::{CascadeFile, SecondaryFile, Tier};
