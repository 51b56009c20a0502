//! Factsheet Domain Layer
//!
//! This crate contains the core value types and trait boundaries of the
//! factsheet pipeline. It has ZERO external dependencies and every other
//! crate in the workspace builds on it.
//!
//! ## Key Concepts
//!
//! - **Specification**: declarative definition of one field's extraction prompt
//! - **Compiled prompt**: the fully assembled instruction for one field
//! - **Extraction record**: raw field → value map produced by the model calls
//! - **Render context**: defaulted field → value map consumed by the renderer
//!
//! ## Architecture
//!
//! ```text
//! document text → compile → [CompiledPrompt] → extract → ExtractionRecord
//!                                                          ↓
//!                          output artifact ← render ← RenderContext
//! ```
//!
//! The model and the specification source are reached only through the
//! traits in [`traits`], so either can be swapped without touching the
//! compiler or the orchestrator.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod record;
pub mod specification;
pub mod traits;

// Re-exports for convenience
pub use record::{ExtractionRecord, RenderContext, NOT_AVAILABLE, NULL_SENTINEL};
pub use specification::{CompiledPrompt, PromptSpecification, INPUT_PLACEHOLDER};
pub use traits::{LlmProvider, SpecificationLoader};
