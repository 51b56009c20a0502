//! Factsheet Extractor
//!
//! Runs compiled field prompts against a language model and collects the
//! answers into an [`ExtractionRecord`](factsheet_domain::ExtractionRecord).
//!
//! # Architecture
//!
//! ```text
//! [CompiledPrompt] → Extractor → LlmProvider (one call per field) → ExtractionRecord
//! ```
//!
//! # Key Features
//!
//! - **Sequential, deterministic**: fields are extracted one at a time, in
//!   prompt order, and the record keeps that order
//! - **Explicit failure policy**: abort on the first failing field, or
//!   record the failure and continue
//! - **No coercion**: answers are stored verbatim; defaulting happens at
//!   render time
//!
//! # Example Usage
//!
//! ```
//! use factsheet_domain::CompiledPrompt;
//! use factsheet_extractor::{Extractor, ExtractorConfig};
//! use factsheet_llm::MockProvider;
//!
//! # fn example() -> Result<(), factsheet_extractor::ExtractorError> {
//! let llm = MockProvider::new("Phase I");
//! let extractor = Extractor::new(llm, ExtractorConfig::default());
//!
//! let prompts = vec![CompiledPrompt::new("s1_study_phase", "Extract the phase...")];
//! let outcome = extractor.extract(&prompts)?;
//!
//! assert_eq!(outcome.record.get("s1_study_phase"), Some("Phase I"));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod types;


pub use config::{ExtractorConfig, FailurePolicy, DEFAULT_INSTRUCTION_SUFFIX};
pub use error::ExtractorError;
pub use extractor::Extractor;
pub use types::{ExtractionMetadata, ExtractionOutcome, FieldFailure};
