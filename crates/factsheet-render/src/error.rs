//! Error types for output rendering

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while rendering the output document
#[derive(Error, Debug)]
pub enum RenderError {
    /// Template is malformed or references an unbound insertion point
    #[error("Failed to render template {template}: {reason}")]
    TemplateRender {
        /// Template path
        template: String,
        /// Underlying cause
        reason: String,
    },

    /// Template or output file could not be read or written
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path involved
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl RenderError {
    pub(crate) fn template(template: &std::path::Path, reason: impl std::fmt::Display) -> Self {
        RenderError::TemplateRender {
            template: template.display().to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RenderError::Io {
            path: path.into(),
            source,
        }
    }
}
