//! Storage adapter contract for tiered storage.
//!
//! A backing store is anything implementing [`StorageAdapter`]: it persists a
//! [`Payload`] at a `/`-separated location and hands out [`StoredFile`]
//! handles for locations, whether or not anything lives there. Adapters are
//! constructed by name through an [`AdapterRegistry`], each against its own
//! effective settings.
//!
//! # Storage Backends
//!
//! - [`FileAdapter`] (`file`) -- local filesystem under `root/store_dir`
//! - [`MemoryAdapter`] (`memory`) -- `HashMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. `retrieve` never checks existence; callers ask the handle.
//! 2. Missing objects are `NotFound` only for operations that need content.
//! 3. Deleting a missing object succeeds.
//! 4. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod file;
pub mod memory;
pub mod payload;
pub mod registry;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{StoreError, StoreResult};
pub use file::{FileAdapter, FileHandle, FILE_ENGINE};
pub use memory::{MemoryAdapter, MemoryFile, MEMORY_ENGINE};
pub use payload::Payload;
pub use registry::{AdapterFactory, AdapterRegistry};
pub use traits::{StorageAdapter, StoredFile};

pub use bytes::Bytes;
