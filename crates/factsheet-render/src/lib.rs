//! Factsheet Render
//!
//! Turns an extraction record into the output factsheet document.
//!
//! # Architecture
//!
//! ```text
//! ExtractionRecord → RenderContext (defaulting) → template → output artifact
//! ```
//!
//! Empty and "null" values are shown as `N/A`. Templates are plain text
//! (Markdown, HTML, ...) or DOCX packages; both use `{{ field_name }}`
//! insertion points, and a template referencing a field the record does not
//! contain fails to render.
//!
//! # Example Usage
//!
//! ```no_run
//! use factsheet_domain::ExtractionRecord;
//! use factsheet_render::TemplateRenderer;
//! use std::path::Path;
//!
//! # fn example() -> Result<(), factsheet_render::RenderError> {
//! let record: ExtractionRecord = [("s1_study_phase", "Phase I")].into_iter().collect();
//! TemplateRenderer::new().render(
//!     &record,
//!     Path::new("templates/factsheet_template.md"),
//!     Path::new("outputs/generated_doc.md"),
//! )?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod docx;
mod error;
mod renderer;

pub use error::RenderError;
pub use renderer::{build_render_context, TemplateKind, TemplateRenderer};
