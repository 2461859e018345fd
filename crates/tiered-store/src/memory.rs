use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use bytes::Bytes;
use tiered_settings::{keys, SettingsSource};

use crate::error::{StoreError, StoreResult};
use crate::payload::Payload;
use crate::traits::{StorageAdapter, StoredFile};

/// Engine name the in-memory adapter registers under.
pub const MEMORY_ENGINE: &str = "memory";

#[derive(Clone, Debug)]
struct MemoryObject {
    data: Bytes,
    content_type: Option<String>,
}

type Objects = Arc<RwLock<HashMap<String, MemoryObject>>>;

fn read_lock(objects: &Objects) -> StoreResult<RwLockReadGuard<'_, HashMap<String, MemoryObject>>> {
    objects
        .read()
        .map_err(|e| StoreError::Backend(format!("lock poisoned: {e}")))
}

fn write_lock(
    objects: &Objects,
) -> StoreResult<RwLockWriteGuard<'_, HashMap<String, MemoryObject>>> {
    objects
        .write()
        .map_err(|e| StoreError::Backend(format!("lock poisoned: {e}")))
}

/// In-memory, HashMap-based storage adapter.
///
/// Intended for tests and embedding. Objects live behind a `RwLock` that is
/// shared with every handle the adapter hands out, so a handle observes
/// later writes and deletes. Data is lost when the last handle is dropped.
pub struct MemoryAdapter {
    settings: Arc<dyn SettingsSource>,
    bucket: String,
    objects: Objects,
}

impl MemoryAdapter {
    /// Build an adapter. `memory_bucket` (default `"default"`) names the
    /// bucket in URLs.
    pub fn new(settings: Arc<dyn SettingsSource>) -> StoreResult<Self> {
        let bucket = settings.str_or(keys::MEMORY_BUCKET, "default")?;
        Ok(Self {
            settings,
            bucket,
            objects: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Number of objects currently stored.
    pub fn len(&self) -> StoreResult<usize> {
        Ok(read_lock(&self.objects)?.len())
    }

    /// Returns `true` if the adapter holds no objects.
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(read_lock(&self.objects)?.is_empty())
    }

    /// Sorted list of stored locations.
    pub fn locations(&self) -> StoreResult<Vec<String>> {
        let mut locations: Vec<String> = read_lock(&self.objects)?.keys().cloned().collect();
        locations.sort();
        Ok(locations)
    }

    fn handle(&self, location: &str) -> MemoryFile {
        MemoryFile {
            location: location.to_string(),
            bucket: self.bucket.clone(),
            objects: Arc::clone(&self.objects),
        }
    }
}

impl StorageAdapter for MemoryAdapter {
    fn engine(&self) -> &str {
        MEMORY_ENGINE
    }

    fn settings(&self) -> &Arc<dyn SettingsSource> {
        &self.settings
    }

    fn store(&self, payload: &Payload, location: &str) -> StoreResult<Box<dyn StoredFile>> {
        validate_location(location)?;
        let object = MemoryObject {
            data: payload.data().clone(),
            content_type: payload.content_type().map(str::to_string),
        };
        write_lock(&self.objects)?.insert(location.to_string(), object);
        tracing::debug!(bucket = %self.bucket, location, len = payload.len(), "memory store");
        Ok(Box::new(self.handle(location)))
    }

    fn retrieve(&self, location: &str) -> StoreResult<Box<dyn StoredFile>> {
        validate_location(location)?;
        Ok(Box::new(self.handle(location)))
    }
}

impl std::fmt::Debug for MemoryAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = read_lock(&self.objects).map(|m| m.len()).unwrap_or(0);
        f.debug_struct("MemoryAdapter")
            .field("bucket", &self.bucket)
            .field("object_count", &count)
            .finish()
    }
}

fn validate_location(location: &str) -> StoreResult<()> {
    if location.is_empty() {
        return Err(StoreError::InvalidLocation {
            location: location.to_string(),
            reason: "empty".into(),
        });
    }
    Ok(())
}

/// Handle to a location inside a [`MemoryAdapter`].
pub struct MemoryFile {
    location: String,
    bucket: String,
    objects: Objects,
}

impl MemoryFile {
    fn object(&self) -> StoreResult<MemoryObject> {
        read_lock(&self.objects)?
            .get(&self.location)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                location: self.location.clone(),
            })
    }
}

impl StoredFile for MemoryFile {
    fn location(&self) -> &str {
        &self.location
    }

    fn path(&self) -> Option<PathBuf> {
        None
    }

    fn exists(&self) -> StoreResult<bool> {
        Ok(read_lock(&self.objects)?.contains_key(&self.location))
    }

    fn read(&self) -> StoreResult<Bytes> {
        Ok(self.object()?.data)
    }

    fn size(&self) -> StoreResult<u64> {
        Ok(self.object()?.data.len() as u64)
    }

    fn url(&self) -> Option<String> {
        Some(format!("memory://{}/{}", self.bucket, self.location))
    }

    fn content_type(&self) -> Option<String> {
        self.object().ok().and_then(|o| o.content_type)
    }

    fn delete(&self) -> StoreResult<()> {
        write_lock(&self.objects)?.remove(&self.location);
        Ok(())
    }
}

impl std::fmt::Debug for MemoryFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryFile")
            .field("bucket", &self.bucket)
            .field("location", &self.location)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiered_settings::Settings;

    fn adapter() -> MemoryAdapter {
        MemoryAdapter::new(Settings::new().into_shared()).unwrap()
    }

    #[test]
    fn store_and_read_back() {
        let a = adapter();
        let payload = Payload::new(b"hello world".to_vec()).with_content_type("text/plain");
        let stored = a.store(&payload, "docs/hello.txt").unwrap();
        assert_eq!(stored.location(), "docs/hello.txt");
        assert_eq!(stored.filename(), Some("hello.txt"));
        assert_eq!(&stored.read().unwrap()[..], b"hello world");
        assert_eq!(stored.size().unwrap(), 11);
        assert_eq!(stored.content_type().as_deref(), Some("text/plain"));
        assert!(stored.path().is_none());
        assert_eq!(a.len().unwrap(), 1);
    }

    #[test]
    fn retrieve_missing_is_handle_not_error() {
        let a = adapter();
        let h = a.retrieve("nothing/here").unwrap();
        assert!(!h.exists().unwrap());
        assert!(matches!(h.read().unwrap_err(), StoreError::NotFound { .. }));
        assert!(matches!(h.size().unwrap_err(), StoreError::NotFound { .. }));
        assert!(h.content_type().is_none());
    }

    #[test]
    fn handles_share_state() {
        let a = adapter();
        let before = a.retrieve("k").unwrap();
        assert!(!before.exists().unwrap());
        a.store(&Payload::from("v"), "k").unwrap();
        assert!(before.exists().unwrap());
        before.delete().unwrap();
        assert!(!a.exists("k").unwrap());
        assert!(a.is_empty().unwrap());
    }

    #[test]
    fn delete_missing_succeeds() {
        let a = adapter();
        a.delete("ghost").unwrap();
    }

    #[test]
    fn overwrite_replaces_content() {
        let a = adapter();
        a.store(&Payload::from("one"), "k").unwrap();
        a.store(&Payload::from("two"), "k").unwrap();
        assert_eq!(&a.retrieve("k").unwrap().read().unwrap()[..], b"two");
        assert_eq!(a.locations().unwrap(), vec!["k".to_string()]);
    }

    #[test]
    fn empty_location_rejected() {
        let a = adapter();
        assert!(matches!(
            a.retrieve("").unwrap_err(),
            StoreError::InvalidLocation { .. }
        ));
        assert!(a.store(&Payload::from("x"), "").is_err());
    }

    #[test]
    fn bucket_from_settings() {
        let s = Settings::new().with(keys::MEMORY_BUCKET, "archive").into_shared();
        let a = MemoryAdapter::new(s).unwrap();
        assert_eq!(a.bucket(), "archive");
        assert_eq!(a.engine(), MEMORY_ENGINE);
        let h = a.retrieve("x/y").unwrap();
        assert_eq!(h.url().as_deref(), Some("memory://archive/x/y"));
    }

    #[test]
    fn separate_adapters_are_independent() {
        let a = adapter();
        let b = adapter();
        a.store(&Payload::from("only in a"), "k").unwrap();
        assert!(!b.exists("k").unwrap());
    }
}
