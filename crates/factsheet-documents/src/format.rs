//! Supported document containers

use crate::error::DocumentError;
use std::path::Path;

/// Supported extensions, in the order they are reported
pub const SUPPORTED_EXTENSIONS: &[&str] = &[".pdf", ".docx", ".txt"];

/// Container format of an input document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    /// Portable Document Format
    Pdf,
    /// Office Open XML word-processing package
    Docx,
    /// UTF-8 plain text
    Txt,
}

impl DocumentFormat {
    /// Detect the format from a file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Result<Self, DocumentError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e.to_lowercase()))
            .unwrap_or_default();

        match extension.as_str() {
            ".pdf" => Ok(DocumentFormat::Pdf),
            ".docx" => Ok(DocumentFormat::Docx),
            ".txt" => Ok(DocumentFormat::Txt),
            _ => Err(DocumentError::UnsupportedFormat {
                extension,
                supported: SUPPORTED_EXTENSIONS.join(", "),
            }),
        }
    }

    /// Get the extension for this format, with leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => ".pdf",
            DocumentFormat::Docx => ".docx",
            DocumentFormat::Txt => ".txt",
        }
    }
}
