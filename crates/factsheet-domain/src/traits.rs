//! Trait definitions for external interactions
//!
//! These traits define the boundaries between pipeline logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::PromptSpecification;
use std::collections::HashMap;

/// Trait for language model operations
///
/// Implemented by the infrastructure layer (factsheet-llm). Calls are
/// synchronous and at-most-once: no streaming, no conversation state.
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate a completion for a fully composed instruction.
    ///
    /// `system` is an optional role framing sent ahead of the instruction.
    fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String, Self::Error>;

    /// Identifier of the model behind this provider
    fn model_name(&self) -> &str {
        "llm"
    }
}

/// Trait for loading prompt specifications from a storage backend
///
/// Implemented by the infrastructure layer (factsheet-prompts). The returned
/// map has no iteration order; callers needing determinism sort by name.
pub trait SpecificationLoader {
    /// Error type for load operations
    type Error;

    /// Load every specification the backend holds, keyed by name
    fn load(&self) -> Result<HashMap<String, PromptSpecification>, Self::Error>;
}
