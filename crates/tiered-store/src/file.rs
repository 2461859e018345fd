use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use tiered_settings::{keys, SettingsSource};

use crate::error::{StoreError, StoreResult};
use crate::payload::Payload;
use crate::traits::{StorageAdapter, StoredFile};

/// Engine name the filesystem adapter registers under.
pub const FILE_ENGINE: &str = "file";

/// Storage adapter for the local filesystem.
///
/// Objects live under `root/store_dir/<location>`. Locations are
/// `/`-separated and must stay inside that directory.
#[derive(Debug)]
pub struct FileAdapter {
    settings: Arc<dyn SettingsSource>,
    base_dir: PathBuf,
    store_dir: String,
    asset_host: Option<String>,
}

impl FileAdapter {
    /// Build an adapter from `root` (default `.`), `store_dir` (default
    /// `uploads`) and the optional `asset_host`.
    pub fn new(settings: Arc<dyn SettingsSource>) -> StoreResult<Self> {
        let root = settings.str_or(keys::ROOT, ".")?;
        let store_dir = settings.str_or(keys::STORE_DIR, "uploads")?;
        let asset_host = match settings.lookup(keys::ASSET_HOST) {
            Some(_) => Some(settings.get_str(keys::ASSET_HOST)?),
            None => None,
        };
        let base_dir = PathBuf::from(root).join(&store_dir);
        tracing::debug!(base_dir = %base_dir.display(), "file adapter ready");
        Ok(Self {
            settings,
            base_dir,
            store_dir,
            asset_host,
        })
    }

    /// Directory every location is resolved against.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Reject locations that could escape the base directory.
    fn validate_location(location: &str) -> StoreResult<()> {
        let invalid = |reason: &str| StoreError::InvalidLocation {
            location: location.to_string(),
            reason: reason.to_string(),
        };
        if location.is_empty() {
            return Err(invalid("empty"));
        }
        if location.starts_with('/') || location.starts_with('\\') {
            return Err(invalid("absolute path"));
        }
        if location.contains('\\') {
            return Err(invalid("contains backslash"));
        }
        if Path::new(location)
            .components()
            .any(|c| c == Component::ParentDir)
        {
            return Err(invalid("parent traversal"));
        }
        Ok(())
    }

    fn resolve(&self, location: &str) -> StoreResult<PathBuf> {
        Self::validate_location(location)?;
        Ok(self.base_dir.join(location))
    }

    fn url_for(&self, location: &str, path: &Path) -> String {
        match &self.asset_host {
            Some(host) => format!(
                "{}/{}/{}",
                host.trim_end_matches('/'),
                self.store_dir.trim_matches('/'),
                location
            ),
            None => path.display().to_string(),
        }
    }

    /// Write to a temp file in the destination directory, then rename into
    /// place so readers never see a partial object.
    fn atomic_write(&self, path: &Path, data: &[u8]) -> StoreResult<()> {
        let dir = path.parent().unwrap_or(&self.base_dir);
        fs::create_dir_all(dir)?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(data)?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    fn handle(&self, location: &str, content_type: Option<String>) -> StoreResult<FileHandle> {
        let path = self.resolve(location)?;
        Ok(FileHandle {
            location: location.to_string(),
            url: self.url_for(location, &path),
            path,
            content_type,
        })
    }
}

impl StorageAdapter for FileAdapter {
    fn engine(&self) -> &str {
        FILE_ENGINE
    }

    fn settings(&self) -> &Arc<dyn SettingsSource> {
        &self.settings
    }

    fn store(&self, payload: &Payload, location: &str) -> StoreResult<Box<dyn StoredFile>> {
        let handle = self.handle(location, payload.content_type().map(str::to_string))?;
        self.atomic_write(&handle.path, payload.data())?;
        tracing::debug!(path = %handle.path.display(), len = payload.len(), "file store");
        Ok(Box::new(handle))
    }

    fn retrieve(&self, location: &str) -> StoreResult<Box<dyn StoredFile>> {
        Ok(Box::new(self.handle(location, None)?))
    }
}

/// Handle to a path under a [`FileAdapter`]'s base directory.
#[derive(Clone, Debug)]
pub struct FileHandle {
    location: String,
    path: PathBuf,
    url: String,
    content_type: Option<String>,
}

impl FileHandle {
    fn not_found(&self) -> StoreError {
        StoreError::NotFound {
            location: self.location.clone(),
        }
    }
}

impl StoredFile for FileHandle {
    fn location(&self) -> &str {
        &self.location
    }

    fn path(&self) -> Option<PathBuf> {
        Some(self.path.clone())
    }

    fn exists(&self) -> StoreResult<bool> {
        match fs::metadata(&self.path) {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn read(&self) -> StoreResult<Bytes> {
        match fs::read(&self.path) {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(self.not_found()),
            Err(e) => Err(e.into()),
        }
    }

    fn size(&self) -> StoreResult<u64> {
        match fs::metadata(&self.path) {
            Ok(meta) if meta.is_file() => Ok(meta.len()),
            Ok(_) => Err(self.not_found()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(self.not_found()),
            Err(e) => Err(e.into()),
        }
    }

    fn url(&self) -> Option<String> {
        Some(self.url.clone())
    }

    fn content_type(&self) -> Option<String> {
        self.content_type.clone()
    }

    fn delete(&self) -> StoreResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
