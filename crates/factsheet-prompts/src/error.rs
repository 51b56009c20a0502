//! Error types for specification loading and compilation

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or compiling specifications
#[derive(Error, Debug)]
pub enum PromptError {
    /// Specification could not be parsed or is missing a required sub-field
    #[error("Malformed specification '{name}': {reason}")]
    MalformedSpecification {
        /// Name of the offending specification
        name: String,
        /// What is wrong with it
        reason: String,
    },

    /// Two storage entries map to the same specification name
    #[error("Duplicate specification name '{name}'")]
    DuplicateSpecification {
        /// The colliding name
        name: String,
    },

    /// Input template failed to render
    #[error("Failed to render input template of '{name}': {reason}")]
    TemplateRender {
        /// Name of the specification owning the template
        name: String,
        /// Underlying cause
        reason: String,
    },

    /// Specification storage could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Path being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl PromptError {
    pub(crate) fn malformed(name: &str, reason: impl Into<String>) -> Self {
        PromptError::MalformedSpecification {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn render(name: &str, reason: impl std::fmt::Display) -> Self {
        PromptError::TemplateRender {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }
}
