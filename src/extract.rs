//! Text extraction for uploaded documents.
//!
//! A [`SourceDocument`] is checked by [`Format::detect`] and then handed to the
//! extractor for its format. DOCX and PDF parsing is delegated to the `docx`
//! and `pdf` modules; their detailed errors are logged and collapsed into
//! [`Error::ParseFailure`].

use crate::error::{Error, Result};
use crate::format::{Format, MAX_FILE_SIZE};
use crate::{docx, pdf};
use std::path::Path;
use tracing::debug;

/// Raw bytes of a file together with the name it was supplied under.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SourceDocument {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a document from disk.
    ///
    /// The size ceiling is checked against file metadata before reading, so
    /// oversized files are rejected without being loaded.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let size = std::fs::metadata(path)?.len();
        if size > MAX_FILE_SIZE {
            return Err(Error::InputTooLarge {
                size,
                limit: MAX_FILE_SIZE,
            });
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let bytes = std::fs::read(path)?;
        Ok(Self::new(name, bytes))
    }
}

/// Detect the document's format and extract its text.
pub fn extract(doc: SourceDocument) -> Result<String> {
    let format = Format::detect(&doc.name, doc.bytes.len() as u64)?;
    debug!(name = %doc.name, ?format, bytes = doc.bytes.len(), "extracting text");
    format.extract(doc.bytes)
}

/// Read a file from disk and extract its text.
pub fn extract_path<P: AsRef<Path>>(path: P) -> Result<String> {
    extract(SourceDocument::read(path)?)
}

impl Format {
    /// Convert raw file bytes of this format into plain text.
    pub fn extract(&self, bytes: Vec<u8>) -> Result<String> {
        match self {
            Format::Text => String::from_utf8(bytes).map_err(|e| {
                debug!(error = %e, "text file is not valid UTF-8");
                self.parse_failure()
            }),
            Format::Docx => docx::read_text(&bytes).map_err(|e| {
                debug!(error = %e, "DOCX extraction failed");
                self.parse_failure()
            }),
            Format::Pdf => pdf::read_text(&bytes).map_err(|e| {
                debug!(error = %e, "PDF extraction failed");
                self.parse_failure()
            }),
        }
    }

    fn parse_failure(&self) -> Error {
        Error::ParseFailure {
            format: self.extension(),
        }
    }
}
