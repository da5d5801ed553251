//! Format detection from a file's name and size.

use crate::error::{Error, Result};

/// Largest file accepted for extraction (10 MiB).
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Document formats that can be turned into plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Docx,
    Pdf,
}

impl Format {
    /// Detect the format of a file, rejecting oversized or unsupported files.
    ///
    /// The size ceiling is checked first, so an oversized file is reported as
    /// too large even when its extension is also unsupported. A bare dotfile
    /// such as `.txt` has no extension and is rejected.
    pub fn detect(name: &str, size: u64) -> Result<Self> {
        if size > MAX_FILE_SIZE {
            return Err(Error::InputTooLarge {
                size,
                limit: MAX_FILE_SIZE,
            });
        }

        let extension = extension_of(name);
        Self::from_extension(&extension).ok_or(Error::UnsupportedFormat { extension })
    }

    /// Map a lower-cased extension to a format.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "txt" => Some(Self::Text),
            "docx" => Some(Self::Docx),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    /// Canonical lower-case extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Docx => "docx",
            Self::Pdf => "pdf",
        }
    }
}

/// Lower-cased text after the last `.` in the final path component.
fn extension_of(name: &str) -> String {
    let file_name = name.rsplit(['/', '\\']).next().unwrap_or(name);
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => ext.to_lowercase(),
        _ => String::new(),
    }
}
