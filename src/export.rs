//! Export of a finished summary to `.txt` or `.docx`.

use crate::docx;
use crate::error::{Error, Result};
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// The summary verbatim
    Txt,
    /// One paragraph per line of the summary
    Docx,
}

impl ExportFormat {
    /// Pick the export format from an output path's extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "txt" => Ok(Self::Txt),
            "docx" => Ok(Self::Docx),
            _ => Err(Error::UnsupportedFormat { extension }),
        }
    }

    /// Render the summary in this format.
    pub fn render(&self, summary: &str) -> Result<Vec<u8>> {
        match self {
            Self::Txt => Ok(summary.as_bytes().to_vec()),
            Self::Docx => Ok(docx::write_paragraphs(summary)?),
        }
    }
}

/// Write `summary` to `path`, choosing the format from the extension.
pub fn write<P: AsRef<Path>>(path: P, summary: &str) -> Result<ExportFormat> {
    let path = path.as_ref();
    let format = ExportFormat::from_path(path)?;
    std::fs::write(path, format.render(summary)?)?;
    info!(path = %path.display(), ?format, "summary exported");
    Ok(format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn format_follows_extension() {
        assert_eq!(
            ExportFormat::from_path(&PathBuf::from("out/summary.TXT")).unwrap(),
            ExportFormat::Txt
        );
        assert_eq!(
            ExportFormat::from_path(&PathBuf::from("summary.docx")).unwrap(),
            ExportFormat::Docx
        );
        assert!(matches!(
            ExportFormat::from_path(&PathBuf::from("summary.pdf")),
            Err(Error::UnsupportedFormat { .. })
        ));
        assert!(matches!(
            ExportFormat::from_path(&PathBuf::from("summary")),
            Err(Error::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn txt_render_is_verbatim() {
        let summary = "• one\n• two\n";
        assert_eq!(ExportFormat::Txt.render(summary).unwrap(), summary.as_bytes());
    }
}
