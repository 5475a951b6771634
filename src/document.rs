//! Input documents supplied for a batch.

use std::borrow::Cow;
use std::io;
use std::path::{Path, PathBuf};

/// Where a document's bytes come from.
#[derive(Debug, Clone)]
enum DocumentSource {
    Memory(Vec<u8>),
    File(PathBuf),
}

/// A named document to encrypt. The name is what the credential table is
/// matched against and what the archive entry is called.
#[derive(Debug, Clone)]
pub struct InputDocument {
    name: String,
    source: DocumentSource,
}

impl InputDocument {
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            source: DocumentSource::Memory(bytes.into()),
        }
    }

    /// Reference a file on disk; its bytes are read when the document is
    /// processed. The document is named after the file name component.
    pub fn from_path(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("Not a file path: {}", path.display()),
                )
            })?;
        Ok(Self {
            name,
            source: DocumentSource::File(path),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            DocumentSource::File(path) => Some(path),
            DocumentSource::Memory(_) => None,
        }
    }

    /// Read the document's bytes. In-memory documents are borrowed.
    pub fn read(&self) -> io::Result<Cow<'_, [u8]>> {
        match &self.source {
            DocumentSource::Memory(bytes) => Ok(Cow::Borrowed(bytes)),
            DocumentSource::File(path) => std::fs::read(path).map(Cow::Owned),
        }
    }
}
