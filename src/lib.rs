//! # Precis
//!
//! A CLI for summarising text, DOCX and PDF documents using LLMs.
//!
//! ## Features
//!
//! - **Document ingestion**: plain text, DOCX and PDF are flattened into a single string
//! - **Styled summaries**: short, medium or detailed; paragraphs or bullet points; any language
//! - **Local key storage**: the provider API key is validated once and kept in sled
//! - **Export**: summaries can be written to `.txt` or `.docx`

pub mod agent;
pub mod config;
pub mod credential;
pub mod docx;
pub mod error;
pub mod export;
pub mod extract;
pub mod format;
pub mod pdf;
pub mod provider;
pub mod summary;

pub use config::Config;
pub use credential::{Client, Credential, CredentialStore, Session};
pub use error::{Error, Result};
pub use extract::SourceDocument;
pub use format::Format;
pub use provider::{OpenAiProvider, Provider};
pub use summary::{Length, OutputFormat, SummaryOptions};
