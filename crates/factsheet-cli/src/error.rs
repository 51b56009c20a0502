//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Prompt specification or compilation error
    #[error(transparent)]
    Prompt(#[from] factsheet_prompts::PromptError),

    /// Input document error
    #[error(transparent)]
    Document(#[from] factsheet_documents::DocumentError),

    /// Field extraction error
    #[error(transparent)]
    Extraction(#[from] factsheet_extractor::ExtractorError),

    /// Model provider error
    #[error(transparent)]
    Llm(#[from] factsheet_llm::LlmError),

    /// Output rendering error
    #[error(transparent)]
    Render(#[from] factsheet_render::RenderError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
