//! Core Extractor implementation

use crate::config::{ExtractorConfig, FailurePolicy};
use crate::error::ExtractorError;
use crate::types::{ExtractionMetadata, ExtractionOutcome, FieldFailure};
use factsheet_domain::{CompiledPrompt, ExtractionRecord, LlmProvider};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// The Extractor runs one model call per compiled prompt
///
/// Calls are issued strictly in sequence; each completes before the next
/// begins. The extractor holds no per-document state, so one instance can
/// serve any number of documents.
pub struct Extractor<L>
where
    L: LlmProvider,
{
    llm_provider: L,
    config: ExtractorConfig,
}

impl<L> Extractor<L>
where
    L: LlmProvider,
    L::Error: std::fmt::Display,
{
    /// Create a new Extractor
    pub fn new(llm_provider: L, config: ExtractorConfig) -> Self {
        Self { llm_provider, config }
    }

    /// The provider behind this extractor
    pub fn provider(&self) -> &L {
        &self.llm_provider
    }

    /// Active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract every field, in prompt order.
    ///
    /// Model answers are stored verbatim, including empty ones.
    ///
    /// # Errors
    ///
    /// With [`FailurePolicy::AbortOnFirstError`] the first failing field is
    /// returned as [`ExtractorError::Extraction`]. With
    /// [`FailurePolicy::ContinueOnError`] failures are collected in the
    /// outcome and [`ExtractorError::AllFieldsFailed`] is returned only when
    /// no field succeeded.
    pub fn extract(&self, prompts: &[CompiledPrompt]) -> Result<ExtractionOutcome, ExtractorError> {
        self.config.validate().map_err(ExtractorError::Config)?;

        let start = Instant::now();
        info!(
            "Starting extraction of {} fields with model '{}' (policy: {})",
            prompts.len(),
            self.llm_provider.model_name(),
            self.config.failure_policy.as_str()
        );

        let mut record = ExtractionRecord::new();
        let mut failures = Vec::new();

        for prompt in prompts {
            let field = prompt.field_name();
            info!(field = %field, "Extracting field");

            match self.extract_field(prompt) {
                Ok(value) => {
                    debug!(field = %field, "Extracted {} chars", value.len());
                    record.insert(field, value);
                }
                Err(reason) => match self.config.failure_policy {
                    FailurePolicy::AbortOnFirstError => {
                        error!(field = %field, "Extraction failed, aborting: {}", reason);
                        return Err(ExtractorError::Extraction {
                            field: field.to_string(),
                            reason,
                        });
                    }
                    FailurePolicy::ContinueOnError => {
                        warn!(field = %field, "Extraction failed, continuing: {}", reason);
                        failures.push(FieldFailure {
                            field: field.to_string(),
                            reason,
                        });
                    }
                },
            }
        }

        if !prompts.is_empty() && record.is_empty() {
            error!("All {} field extractions failed", prompts.len());
            return Err(ExtractorError::AllFieldsFailed {
                attempted: prompts.len(),
            });
        }

        let metadata = ExtractionMetadata {
            model_name: self.llm_provider.model_name().to_string(),
            fields_attempted: prompts.len(),
            fields_succeeded: record.len(),
            processing_time_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            "Extraction complete: {} succeeded, {} failed",
            metadata.fields_succeeded,
            failures.len()
        );

        Ok(ExtractionOutcome {
            record,
            failures,
            metadata,
        })
    }

    /// Submit one prompt to the model
    fn extract_field(&self, prompt: &CompiledPrompt) -> Result<String, String> {
        let submission = self.submission_text(prompt);
        self.llm_provider
            .generate(&submission, self.config.system_prompt.as_deref())
            .map_err(|e| e.to_string())
    }

    /// Text sent to the model: the compiled instruction plus the configured suffix
    pub(crate) fn submission_text(&self, prompt: &CompiledPrompt) -> String {
        match self.config.instruction_suffix.as_deref().map(str::trim) {
            Some(suffix) if !suffix.is_empty() => format!("{}\n{}", prompt.instruction(), suffix),
            _ => prompt.instruction().to_string(),
        }
    }
}
