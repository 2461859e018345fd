//! Handles returned by a cascade.
//!
//! [`CascadeFile`] is what [`Cascade::retrieve`](crate::Cascade::retrieve)
//! hands back: either the primary tier's handle untouched, or a
//! [`SecondaryFile`] wrapping the secondary tier's handle. Both satisfy
//! [`StoredFile`], so callers only need to care which tier answered when
//! they want to.

use std::fmt;
use std::path::PathBuf;

use tiered_store::{Bytes, StoreResult, StoredFile};

/// Which tier a handle came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tier {
    Primary,
    Secondary,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::Secondary => write!(f, "secondary"),
        }
    }
}

/// A secondary-tier handle with guarded deletion.
///
/// Every operation forwards to the wrapped handle with the same arguments,
/// return value and errors. `delete` reaches the wrapped handle only when
/// deletion was allowed at wrap time; otherwise it does nothing and
/// reports success.
#[derive(Debug)]
pub struct SecondaryFile {
    real_file: Box<dyn StoredFile>,
    deletion_allowed: bool,
}

impl SecondaryFile {
    pub fn new(real_file: Box<dyn StoredFile>, deletion_allowed: bool) -> Self {
        Self {
            real_file,
            deletion_allowed,
        }
    }

    /// The handle obtained from the secondary adapter.
    pub fn real_file(&self) -> &dyn StoredFile {
        self.real_file.as_ref()
    }

    pub fn into_inner(self) -> Box<dyn StoredFile> {
        self.real_file
    }

    pub fn deletion_allowed(&self) -> bool {
        self.deletion_allowed
    }
}

impl StoredFile for SecondaryFile {
    fn location(&self) -> &str {
        self.real_file.location()
    }

    fn filename(&self) -> Option<&str> {
        self.real_file.filename()
    }

    fn path(&self) -> Option<PathBuf> {
        self.real_file.path()
    }

    fn exists(&self) -> StoreResult<bool> {
        self.real_file.exists()
    }

    fn read(&self) -> StoreResult<Bytes> {
        self.real_file.read()
    }

    fn size(&self) -> StoreResult<u64> {
        self.real_file.size()
    }

    fn url(&self) -> Option<String> {
        self.real_file.url()
    }

    fn content_type(&self) -> Option<String> {
        self.real_file.content_type()
    }

    fn delete(&self) -> StoreResult<()> {
        if self.deletion_allowed {
            return self.real_file.delete();
        }
        tracing::debug!(
            location = self.real_file.location(),
            "secondary deletion disallowed; skipping"
        );
        Ok(())
    }
}

/// Handle returned by a cascade retrieval.
#[derive(Debug)]
pub enum CascadeFile {
    /// The primary tier's handle, returned as-is.
    Primary(Box<dyn StoredFile>),
    /// The secondary tier's handle, wrapped.
    Secondary(SecondaryFile),
}

impl CascadeFile {
    pub fn tier(&self) -> Tier {
        match self {
            Self::Primary(_) => Tier::Primary,
            Self::Secondary(_) => Tier::Secondary,
        }
    }

    pub fn is_secondary(&self) -> bool {
        matches!(self, Self::Secondary(_))
    }

    pub fn as_secondary(&self) -> Option<&SecondaryFile> {
        match self {
            Self::Secondary(file) => Some(file),
            Self::Primary(_) => None,
        }
    }

    /// Unwrap into a boxed handle. A secondary file keeps its deletion guard.
    pub fn into_boxed(self) -> Box<dyn StoredFile> {
        match self {
            Self::Primary(file) => file,
            Self::Secondary(file) => Box::new(file),
        }
    }

    fn file(&self) -> &dyn StoredFile {
        match self {
            Self::Primary(file) => file.as_ref(),
            Self::Secondary(file) => file,
        }
    }
}

impl StoredFile for CascadeFile {
    fn location(&self) -> &str {
        self.file().location()
    }

    fn filename(&self) -> Option<&str> {
        self.file().filename()
    }

    fn path(&self) -> Option<PathBuf> {
        self.file().path()
    }

    fn exists(&self) -> StoreResult<bool> {
        self.file().exists()
    }

    fn read(&self) -> StoreResult<Bytes> {
        self.file().read()
    }

    fn size(&self) -> StoreResult<u64> {
        self.file().size()
    }

    fn url(&self) -> Option<String> {
        self.file().url()
    }

    fn content_type(&self) -> Option<String> {
        self.file().content_type()
    }

    fn delete(&self) -> StoreResult<()> {
        self.file().delete()
    }
}
