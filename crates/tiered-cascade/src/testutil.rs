//! Recording adapters and handles for cascade tests.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tiered_settings::SettingsSource;
use tiered_store::{Bytes, Payload, StorageAdapter, StoreError, StoreResult, StoredFile};

/// A handle whose every answer is derived from its `marker`.
#[derive(Clone, Debug)]
pub(crate) struct MockFile {
    marker: String,
    location: String,
    filename: String,
    exists: bool,
    fail_reads: bool,
    fail_deletes: bool,
    calls: Arc<AtomicUsize>,
    deletes: Arc<AtomicUsize>,
}

impl MockFile {
    pub(crate) fn new(marker: &str, location: &str) -> Self {
        Self {
            marker: marker.to_string(),
            location: location.to_string(),
            filename: format!("custom-{marker}"),
            exists: true,
            fail_reads: false,
            fail_deletes: false,
            calls: Arc::new(AtomicUsize::new(0)),
            deletes: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(crate) fn missing(mut self) -> Self {
        self.exists = false;
        self
    }

    pub(crate) fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    pub(crate) fn failing_deletes(mut self) -> Self {
        self.fail_deletes = true;
        self
    }

    pub(crate) fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    pub(crate) fn deletes(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.deletes)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn read_failure(&self) -> StoreError {
        StoreError::Backend(format!("read failed: {}", self.marker))
    }
}

impl StoredFile for MockFile {
    fn location(&self) -> &str {
        self.hit();
        &self.location
    }

    fn filename(&self) -> Option<&str> {
        self.hit();
        Some(&self.filename)
    }

    fn path(&self) -> Option<PathBuf> {
        self.hit();
        Some(PathBuf::from(format!("/mock/{}/{}", self.marker, self.location)))
    }

    fn exists(&self) -> StoreResult<bool> {
        self.hit();
        if self.fail_reads {
            return Err(self.read_failure());
        }
        Ok(self.exists)
    }

    fn read(&self) -> StoreResult<Bytes> {
        self.hit();
        if self.fail_reads {
            return Err(self.read_failure());
        }
        Ok(Bytes::from(format!("{}:{}", self.marker, self.location)))
    }

    fn size(&self) -> StoreResult<u64> {
        self.hit();
        if self.fail_reads {
            return Err(self.read_failure());
        }
        Ok(42)
    }

    fn url(&self) -> Option<String> {
        self.hit();
        Some(format!("mock://{}/{}", self.marker, self.location))
    }

    fn content_type(&self) -> Option<String> {
        self.hit();
        Some(format!("application/x-{}", self.marker))
    }

    fn delete(&self) -> StoreResult<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        if self.fail_deletes {
            return Err(StoreError::Backend(format!("delete failed: {}", self.marker)));
        }
        Ok(())
    }
}

/// Call counters shared between a [`MockAdapter`] and the test holding it.
#[derive(Debug, Default)]
pub(crate) struct Probe {
    pub(crate) stores: AtomicUsize,
    pub(crate) retrieves: AtomicUsize,
    pub(crate) deletes: Arc<AtomicUsize>,
}

impl Probe {
    pub(crate) fn stores(&self) -> usize {
        self.stores.load(Ordering::SeqCst)
    }

    pub(crate) fn retrieves(&self) -> usize {
        self.retrieves.load(Ordering::SeqCst)
    }

    pub(crate) fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }
}

/// An adapter that hands out [`MockFile`]s and counts calls.
#[derive(Debug)]
pub(crate) struct MockAdapter {
    engine: String,
    settings: Arc<dyn SettingsSource>,
    exists: bool,
    fail_deletes: bool,
    fail_reads: bool,
    fail_io: bool,
    probe: Arc<Probe>,
}

impl MockAdapter {
    pub(crate) fn new(engine: &str, settings: Arc<dyn SettingsSource>) -> Self {
        Self {
            engine: engine.to_string(),
            settings,
            exists: true,
            fail_deletes: false,
            fail_reads: false,
            fail_io: false,
            probe: Arc::new(Probe::default()),
        }
    }

    /// Handles from this adapter report non-existence.
    pub(crate) fn empty(mut self) -> Self {
        self.exists = false;
        self
    }

    pub(crate) fn failing_deletes(mut self) -> Self {
        self.fail_deletes = true;
        self
    }

    /// Handles from this adapter fail `exists`, `read` and `size`.
    pub(crate) fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    /// `store` and `retrieve` themselves fail.
    pub(crate) fn failing_io(mut self) -> Self {
        self.fail_io = true;
        self
    }

    pub(crate) fn with_probe(mut self, probe: Arc<Probe>) -> Self {
        self.probe = probe;
        self
    }

    pub(crate) fn probe(&self) -> Arc<Probe> {
        Arc::clone(&self.probe)
    }

    fn handle(&self, location: &str) -> MockFile {
        let mut file = MockFile::new(&self.engine, location);
        file.deletes = Arc::clone(&self.probe.deletes);
        if !self.exists {
            file = file.missing();
        }
        if self.fail_deletes {
            file = file.failing_deletes();
        }
        if self.fail_reads {
            file = file.failing_reads();
        }
        file
    }

    fn io_failure(&self, op: &str) -> StoreError {
        StoreError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("{} {op} failed", self.engine),
        ))
    }
}

impl StorageAdapter for MockAdapter {
    fn engine(&self) -> &str {
        &self.engine
    }

    fn settings(&self) -> &Arc<dyn SettingsSource> {
        &self.settings
    }

    fn store(&self, _payload: &Payload, location: &str) -> StoreResult<Box<dyn StoredFile>> {
        self.probe.stores.fetch_add(1, Ordering::SeqCst);
        if self.fail_io {
            return Err(self.io_failure("store"));
        }
        Ok(Box::new(self.handle(location)))
    }

    fn retrieve(&self, location: &str) -> StoreResult<Box<dyn StoredFile>> {
        self.probe.retrieves.fetch_add(1, Ordering::SeqCst);
        if self.fail_io {
            return Err(self.io_failure("retrieve"));
        }
        Ok(Box::new(self.handle(location)))
    }
}
