use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use tiered_settings::SettingsSource;

use crate::error::StoreResult;
use crate::payload::Payload;

/// Handle to an object at one location in one backing store.
///
/// A handle is cheap to obtain: adapters hand one out for any location,
/// whether or not an object lives there. Callers ask
/// [`exists`](StoredFile::exists) when the difference matters.
///
/// All I/O errors are propagated, never silently treated as "missing".
pub trait StoredFile: Send + Sync + fmt::Debug {
    /// Location the handle was retrieved or stored under.
    fn location(&self) -> &str;

    /// Last path segment of the location.
    fn filename(&self) -> Option<&str> {
        self.location().rsplit('/').next().filter(|s| !s.is_empty())
    }

    /// Local filesystem path, for backends that have one.
    fn path(&self) -> Option<PathBuf>;

    /// Whether an object currently exists at this location.
    fn exists(&self) -> StoreResult<bool>;

    /// Read the full object contents.
    ///
    /// Returns `Err(StoreError::NotFound)` if there is no object.
    fn read(&self) -> StoreResult<Bytes>;

    /// Size of the object in bytes.
    fn size(&self) -> StoreResult<u64>;

    /// Public URL for the object, if the backend can produce one.
    fn url(&self) -> Option<String>;

    /// Content type recorded for the object, if known.
    fn content_type(&self) -> Option<String>;

    /// Remove the object. Removing a missing object succeeds.
    fn delete(&self) -> StoreResult<()>;
}

impl<T: StoredFile + ?Sized> StoredFile for Box<T> {
    fn location(&self) -> &str {
        (**self).location()
    }

    fn filename(&self) -> Option<&str> {
        (**self).filename()
    }

    fn path(&self) -> Option<PathBuf> {
        (**self).path()
    }

    fn exists(&self) -> StoreResult<bool> {
        (**self).exists()
    }

    fn read(&self) -> StoreResult<Bytes> {
        (**self).read()
    }

    fn size(&self) -> StoreResult<u64> {
        (**self).size()
    }

    fn url(&self) -> Option<String> {
        (**self).url()
    }

    fn content_type(&self) -> Option<String> {
        (**self).content_type()
    }

    fn delete(&self) -> StoreResult<()> {
        (**self).delete()
    }
}

/// A backing store that can persist payloads at named locations.
///
/// Each adapter is bound at construction to the settings it was built
/// against (see [`AdapterRegistry`](crate::AdapterRegistry)). Implementations
/// must be safe to call from several threads at once.
pub trait StorageAdapter: Send + Sync + fmt::Debug {
    /// Registry name of the engine behind this adapter (e.g. `"file"`).
    fn engine(&self) -> &str;

    /// The effective settings this adapter was constructed with.
    fn settings(&self) -> &Arc<dyn SettingsSource>;

    /// Persist `payload` at `location` and return a handle to it.
    fn store(&self, payload: &Payload, location: &str) -> StoreResult<Box<dyn StoredFile>>;

    /// Obtain a handle for `location`. Does not check existence.
    fn retrieve(&self, location: &str) -> StoreResult<Box<dyn StoredFile>>;

    /// Whether an object exists at `location`.
    fn exists(&self, location: &str) -> StoreResult<bool> {
        self.retrieve(location)?.exists()
    }

    /// Delete the object at `location`.
    fn delete(&self, location: &str) -> StoreResult<()> {
        self.retrieve(location)?.delete()
    }
}
