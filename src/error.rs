//! Error taxonomy shared by extraction, credential handling and summarisation.
//!
//! Every variant renders as a short notice suitable for showing to the user
//! as-is. Provider HTTP statuses are mapped onto these variants in `agent` and
//! `credential`, so callers never inspect raw codes.

use crate::credential::StorageError;
use crate::docx::DocxError;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("file is {size} bytes, which exceeds the {limit} byte limit")]
    InputTooLarge { size: u64, limit: u64 },
    #[error("unsupported file type: {}", display_extension(.extension))]
    UnsupportedFormat { extension: String },
    #[error("failed to parse {format} document")]
    ParseFailure { format: &'static str },
    #[error("no API key configured; run `precis key set` first")]
    Uninitialized,
    #[error("invalid API key")]
    InvalidCredential,
    #[error("rate limit exceeded, please try again later")]
    RateLimited,
    #[error("the summarisation service is unavailable, please try again later")]
    ServiceUnavailable,
    #[error("failed to generate summary{}", display_status(.status))]
    UnknownFailure { status: Option<u16> },
    #[error("API key is required")]
    CredentialRequired,
    #[error("invalid API key format, it should start with '{prefix}'")]
    MalformedCredential { prefix: &'static str },
    #[error("failed to validate API key")]
    ValidationFailed,
    #[error("please enter some text to summarise")]
    EmptyInput,
    #[error("credential storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("failed to build export document: {0}")]
    Export(#[from] DocxError),
    #[error("failed to read or write file: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the user should be asked for a new API key.
    pub fn requires_reentry(&self) -> bool {
        matches!(self, Error::Uninitialized | Error::InvalidCredential)
    }
}

fn display_extension(extension: &str) -> String {
    if extension.is_empty() {
        "(no extension)".to_string()
    } else {
        format!(".{}", extension)
    }
}

fn display_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (HTTP {})", code),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reentry_only_for_credential_problems() {
        assert!(Error::Uninitialized.requires_reentry());
        assert!(Error::InvalidCredential.requires_reentry());
        assert!(!Error::RateLimited.requires_reentry());
        assert!(!Error::ServiceUnavailable.requires_reentry());
        assert!(!Error::UnknownFailure { status: None }.requires_reentry());
    }

    #[test]
    fn notices_are_human_readable() {
        let err = Error::UnsupportedFormat {
            extension: "rtf".to_string(),
        };
        assert_eq!(err.to_string(), "unsupported file type: .rtf");

        let err = Error::UnsupportedFormat {
            extension: String::new(),
        };
        assert_eq!(err.to_string(), "unsupported file type: (no extension)");

        let err = Error::UnknownFailure { status: Some(418) };
        assert_eq!(err.to_string(), "failed to generate summary (HTTP 418)");

        let err = Error::UnknownFailure { status: None };
        assert_eq!(err.to_string(), "failed to generate summary");
    }
}
