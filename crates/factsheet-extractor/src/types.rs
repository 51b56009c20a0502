//! Result types for extraction

use factsheet_domain::ExtractionRecord;

/// Result of an extraction run
#[derive(Debug, Clone)]
pub struct ExtractionOutcome {
    /// Field values, in prompt order
    pub record: ExtractionRecord,

    /// Fields whose model call failed (continue-on-error policy only)
    pub failures: Vec<FieldFailure>,

    /// Metadata about the run
    pub metadata: ExtractionMetadata,
}

impl ExtractionOutcome {
    /// Whether every attempted field produced a value
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// A field that could not be extracted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFailure {
    /// Field name
    pub field: String,

    /// Reason for failure
    pub reason: String,
}

/// Metadata about an extraction run
#[derive(Debug, Clone)]
pub struct ExtractionMetadata {
    /// Name of the LLM model used
    pub model_name: String,

    /// Number of fields attempted
    pub fields_attempted: usize,

    /// Number of fields that produced a value
    pub fields_succeeded: usize,

    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}
