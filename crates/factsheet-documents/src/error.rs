//! Error types for document text extraction

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading a document
#[derive(Error, Debug)]
pub enum DocumentError {
    /// File extension is not a supported container
    #[error("Unsupported file format: {extension}. Supported formats: {supported}")]
    UnsupportedFormat {
        /// Rejected extension, with leading dot (empty if none)
        extension: String,
        /// Supported extensions, comma separated
        supported: String,
    },

    /// File exceeds the configured size limit
    #[error("File too large: {size} bytes (max: {limit} bytes)")]
    FileTooLarge {
        /// Actual size in bytes
        size: u64,
        /// Limit in bytes
        limit: u64,
    },

    /// PDF could not be parsed
    #[error("PDF parse error: {0}")]
    Pdf(String),

    /// DOCX package could not be parsed
    #[error("DOCX parse error: {0}")]
    Docx(String),

    /// File could not be read or written
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path involved
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl DocumentError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DocumentError::Io {
            path: path.into(),
            source,
        }
    }
}
