//! Error types for the Extractor

use thiserror::Error;

/// Errors that can occur during extraction
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Model call for a field failed
    #[error("Extraction failed for field '{field}': {reason}")]
    Extraction {
        /// Field being extracted
        field: String,
        /// Underlying model error
        reason: String,
    },

    /// Every attempted field failed (continue-on-error policy)
    #[error("All {attempted} field extractions failed")]
    AllFieldsFailed {
        /// Number of fields attempted
        attempted: usize,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
