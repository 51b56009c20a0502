//! Factsheet Documents
//!
//! Raw text extraction from uploaded clinical-trial documents.
//!
//! Supported containers are PDF, DOCX and plain text. Anything else is
//! rejected with [`DocumentError::UnsupportedFormat`], naming the offending
//! extension and the supported set.
//!
//! # Example Usage
//!
//! ```no_run
//! use factsheet_documents::{DocumentLimits, DocumentReader};
//!
//! # fn example() -> Result<(), factsheet_documents::DocumentError> {
//! let reader = DocumentReader::new(DocumentLimits::default());
//! let text = reader.read("uploads/synopsis.pdf")?;
//! println!("{} chars", text.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod error;
mod extract;
mod format;
mod upload;

pub use error::DocumentError;
pub use extract::{extract_input_text, DocumentLimits, DocumentReader};
pub use format::{DocumentFormat, SUPPORTED_EXTENSIONS};
pub use upload::{cleanup_upload, stage_upload, validate_file_size};
