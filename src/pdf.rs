//! PDF text extraction backed by `pdf-extract`.

use std::panic::{self, UnwindSafe};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("pdf extraction failed: {0}")]
    Extract(#[from] pdf_extract::OutputError),
    #[error("pdf extraction aborted on malformed input")]
    Aborted,
}

/// Extract text from PDF bytes, one line per page.
///
/// Fragments within a page are joined with single spaces, so word spacing
/// follows the page layout rather than the document's semantic structure.
pub fn read_text(bytes: &[u8]) -> Result<String, PdfError> {
    // pdf-extract panics on some malformed fonts and streams
    let pages = catch_silently(|| pdf_extract::extract_text_from_mem_by_pages(bytes))
        .map_err(|message| {
            debug!(panic = %message, "pdf-extract panicked");
            PdfError::Aborted
        })??;
    Ok(join_pages(&pages))
}

/// Run `f`, turning a panic into its message without printing it.
///
/// The default hook would write the panic to stderr on top of the error the
/// caller reports, so a silent hook is installed for the duration of the call.
fn catch_silently<F, T>(f: F) -> Result<T, String>
where
    F: FnOnce() -> T + UnwindSafe,
{
    let previous = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let result = panic::catch_unwind(f);
    panic::set_hook(previous);

    result.map_err(|payload| {
        payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string())
    })
}

fn join_pages<S: AsRef<str>>(pages: &[S]) -> String {
    let mut text = String::new();
    for page in pages {
        let line = page.as_ref().split_whitespace().collect::<Vec<_>>().join(" ");
        text.push_str(&line);
        text.push('\n');
    }
    text.trim().to_string()
}
