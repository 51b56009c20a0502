//! Factsheet Prompts
//!
//! Loads declarative extraction-field specifications and compiles them into
//! self-contained instructions for a language model.
//!
//! # Architecture
//!
//! ```text
//! prompts/*.yaml → SpecificationLoader → {name → PromptSpecification}
//!                                                   ↓
//!                          document text → PromptCompiler → [CompiledPrompt]
//! ```
//!
//! # Specification format
//!
//! ```yaml
//! prompt_config:
//!   role: You are a clinical research assistant.
//!   context: The document is a clinical trial synopsis.
//!   extraction_fields: The study phase (e.g. Phase I).
//!   constraints:
//!     - Answer with the phase only
//!     - Answer null if the phase is not stated
//! input_template: |
//!   Text: {{ input_text }}
//! ```
//!
//! # Example Usage
//!
//! ```no_run
//! use factsheet_domain::SpecificationLoader;
//! use factsheet_prompts::{DirectorySpecificationLoader, PromptCompiler};
//!
//! # fn example() -> Result<(), factsheet_prompts::PromptError> {
//! let specs = DirectorySpecificationLoader::new("prompts").load()?;
//! let prompts = PromptCompiler::new().compile(specs.values(), "This is a Phase I study.")?;
//!
//! for prompt in &prompts {
//!     println!("{}: {} chars", prompt.field_name(), prompt.instruction().len());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod compiler;
mod error;
mod loader;
mod schema;

pub use compiler::{format_constraints, PromptCompiler, CONSTRAINTS_HEADER, EXTRACTION_HEADER};
pub use error::PromptError;
pub use loader::{DirectorySpecificationLoader, InMemorySpecificationLoader, SPECIFICATION_EXTENSIONS};
pub use schema::parse_specification;
