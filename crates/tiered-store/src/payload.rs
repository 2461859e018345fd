use std::path::Path;

use bytes::Bytes;

use crate::error::StoreResult;

/// Bytes handed to an adapter for storage, plus optional metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Payload {
    data: Bytes,
    filename: Option<String>,
    content_type: Option<String>,
}

impl Payload {
    /// Wrap raw bytes with no metadata.
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            filename: None,
            content_type: None,
        }
    }

    /// Read a whole file from disk, taking its name as the payload filename.
    pub fn from_path(path: &Path) -> StoreResult<Self> {
        let data = std::fs::read(path)?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        Ok(Self {
            data: Bytes::from(data),
            filename,
            content_type: None,
        })
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// The payload bytes. Cloning is cheap (reference counted).
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl From<Vec<u8>> for Payload {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl From<&'static str> for Payload {
    fn from(data: &'static str) -> Self {
        Self::new(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_metadata() {
        let p = Payload::new(b"hello".to_vec())
            .with_filename("hello.txt")
            .with_content_type("text/plain");
        assert_eq!(p.len(), 5);
        assert!(!p.is_empty());
        assert_eq!(p.filename(), Some("hello.txt"));
        assert_eq!(p.content_type(), Some("text/plain"));
        assert_eq!(&p.data()[..], b"hello");
    }

    #[test]
    fn from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("avatar.png");
        std::fs::write(&path, [1u8, 2, 3]).unwrap();
        let p = Payload::from_path(&path).unwrap();
        assert_eq!(p.filename(), Some("avatar.png"));
        assert_eq!(p.len(), 3);
        assert!(Payload::from_path(&dir.path().join("missing")).is_err());
    }
}
