//! Template context building and rendering

use crate::docx::render_docx;
use crate::error::RenderError;
use factsheet_domain::{ExtractionRecord, RenderContext};
use minijinja::value::Value;
use minijinja::{AutoEscape, Environment, Output, State, UndefinedBehavior};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, error, info};

/// Build the display context for a record (empty / "null" → "N/A")
pub fn build_render_context(record: &ExtractionRecord) -> RenderContext {
    RenderContext::from_record(record)
}

/// How a template file is interpreted, decided by its extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    /// Word package; XML parts are rendered with escaped values
    Docx,
    /// Any other file, rendered as UTF-8 text without escaping
    Text,
}

impl TemplateKind {
    /// Detect the template kind from its path
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("docx") => TemplateKind::Docx,
            _ => TemplateKind::Text,
        }
    }
}

/// Renders extraction records into document templates
pub struct TemplateRenderer {
    text_env: Environment<'static>,
    xml_env: Environment<'static>,
}

impl TemplateRenderer {
    /// Create a renderer with strict insertion-point checking
    pub fn new() -> Self {
        let mut text_env = Environment::new();
        text_env.set_undefined_behavior(UndefinedBehavior::Strict);
        text_env.set_keep_trailing_newline(true);
        text_env.set_auto_escape_callback(|_| AutoEscape::None);

        let mut xml_env = Environment::new();
        xml_env.set_undefined_behavior(UndefinedBehavior::Strict);
        xml_env.set_keep_trailing_newline(true);
        xml_env.set_auto_escape_callback(|_| AutoEscape::None);
        xml_env.set_formatter(xml_formatter);

        Self { text_env, xml_env }
    }

    /// Render a record into the template and write the result to `output_path`.
    ///
    /// The artifact is written to a temporary file next to `output_path` and
    /// renamed over it only once rendering succeeded, so a failed render
    /// never leaves a partial document behind. Any existing file at
    /// `output_path` is replaced.
    pub fn render(
        &self,
        record: &ExtractionRecord,
        template_path: &Path,
        output_path: &Path,
    ) -> Result<(), RenderError> {
        let context = build_render_context(record);

        let result = self
            .render_to_bytes(&context, template_path)
            .and_then(|bytes| write_atomically(output_path, &bytes));

        match result {
            Ok(()) => {
                info!("Factsheet saved successfully to {}", output_path.display());
                Ok(())
            }
            Err(e) => {
                error!(template = %template_path.display(), "Failed to generate factsheet: {}", e);
                Err(e)
            }
        }
    }

    /// Render a context into the template, returning the document bytes
    pub fn render_to_bytes(
        &self,
        context: &RenderContext,
        template_path: &Path,
    ) -> Result<Vec<u8>, RenderError> {
        let values: BTreeMap<&str, &str> = context.iter().collect();
        let kind = TemplateKind::from_path(template_path);
        debug!(
            template = %template_path.display(),
            "Rendering {} fields into {:?} template",
            values.len(),
            kind
        );

        match kind {
            TemplateKind::Docx => render_docx(&self.xml_env, template_path, &values),
            TemplateKind::Text => {
                let source = fs::read_to_string(template_path)
                    .map_err(|e| RenderError::io(template_path, e))?;
                let rendered = self
                    .text_env
                    .render_str(&source, &values)
                    .map_err(|e| RenderError::template(template_path, e))?;
                Ok(rendered.into_bytes())
            }
        }
    }
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn write_atomically(output_path: &Path, bytes: &[u8]) -> Result<(), RenderError> {
    let dir = match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| RenderError::io(dir, e))?;
    tmp.write_all(bytes)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| RenderError::io(tmp.path(), e))?;
    tmp.persist(output_path)
        .map_err(|e| RenderError::io(output_path, e.error))?;
    Ok(())
}

/// Write a value into an XML part with markup characters escaped
fn xml_formatter(out: &mut Output, _state: &State, value: &Value) -> Result<(), minijinja::Error> {
    let escaped = match value.as_str() {
        Some(s) => escape_xml(s),
        None => escape_xml(&value.to_string()),
    };
    fmt::Write::write_str(out, &escaped).map_err(minijinja::Error::from)
}

/// Escape the five XML special characters and nothing else
fn escape_xml(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_kind() {
        assert_eq!(TemplateKind::from_path(Path::new("t.docx")), TemplateKind::Docx);
        assert_eq!(TemplateKind::from_path(Path::new("t.DOCX")), TemplateKind::Docx);
        assert_eq!(TemplateKind::from_path(Path::new("t.md")), TemplateKind::Text);
        assert_eq!(TemplateKind::from_path(Path::new("template")), TemplateKind::Text);
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("N/A"), "N/A");
        assert_eq!(escape_xml("18-55 years, BMI 18.5/30"), "18-55 years, BMI 18.5/30");
        assert_eq!(
            escape_xml("X & Y <a> \"b\" 'c'"),
            "X &amp; Y &lt;a&gt; &quot;b&quot; &apos;c&apos;"
        );
    }

    #[test]
    fn test_build_render_context() {
        let record: ExtractionRecord = [("phase", "Phase I"), ("bmi", "null"), ("title", "")]
            .into_iter()
            .collect();
        let context = build_render_context(&record);

        let pairs: Vec<_> = context.iter().collect();
        assert_eq!(
            pairs,
            vec![("phase", "Phase I"), ("bmi", "N/A"), ("title", "N/A")]
        );
    }
}
