//! Output formatting for the CLI.

use crate::error::Result;
use colored::*;
use factsheet_domain::{CompiledPrompt, ExtractionRecord, PromptSpecification};
use factsheet_extractor::FieldFailure;
use serde::Serialize;
use std::path::Path;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

#[derive(Serialize)]
struct FieldJson<'a> {
    field: &'a str,
    value: &'a str,
}

#[derive(Serialize)]
struct SpecJson<'a> {
    name: &'a str,
    role: &'a str,
    extraction_fields: &'a str,
    constraints: &'a [String],
}

#[derive(Serialize)]
struct PromptJson<'a> {
    field: &'a str,
    instruction: &'a str,
}

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Active output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format extracted field values, in record order.
    pub fn format_record(&self, record: &ExtractionRecord) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let fields: Vec<FieldJson> = record
                    .iter()
                    .map(|(field, value)| FieldJson { field, value })
                    .collect();
                Ok(serde_json::to_string_pretty(&fields)?)
            }
            OutputFormat::Table => {
                if record.is_empty() {
                    return Ok(self.colorize("No fields extracted.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["Field", "Value"]);
                for (field, value) in record.iter() {
                    builder.push_record([field, value]);
                }
                Ok(self.table(builder))
            }
            OutputFormat::Quiet => Ok(record
                .iter()
                .map(|(field, value)| format!("{}={}", field, value))
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    /// Format loaded specifications, sorted by name.
    pub fn format_specs(&self, specs: &[&PromptSpecification]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let specs: Vec<SpecJson> = specs
                    .iter()
                    .map(|s| SpecJson {
                        name: &s.name,
                        role: &s.role,
                        extraction_fields: &s.extraction_fields,
                        constraints: &s.constraints,
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&specs)?)
            }
            OutputFormat::Table => {
                if specs.is_empty() {
                    return Ok(self.colorize("No prompt specifications found.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["Name", "Role", "Constraints"]);
                for spec in specs {
                    builder.push_record([
                        spec.name.clone(),
                        truncate(spec.role.trim(), 60),
                        spec.constraints.len().to_string(),
                    ]);
                }
                Ok(self.table(builder))
            }
            OutputFormat::Quiet => Ok(specs
                .iter()
                .map(|s| s.name.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    /// Format compiled prompts.
    pub fn format_prompts(&self, prompts: &[CompiledPrompt]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let prompts: Vec<PromptJson> = prompts
                    .iter()
                    .map(|p| PromptJson {
                        field: p.field_name(),
                        instruction: p.instruction(),
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&prompts)?)
            }
            OutputFormat::Table => {
                if prompts.is_empty() {
                    return Ok(self.colorize("No prompts compiled.", "yellow"));
                }

                let sections: Vec<String> = prompts
                    .iter()
                    .map(|p| {
                        format!(
                            "{}\n{}",
                            self.colorize(&format!("=== {} ===", p.field_name()), "cyan"),
                            p.instruction()
                        )
                    })
                    .collect();
                Ok(sections.join("\n\n"))
            }
            OutputFormat::Quiet => Ok(prompts
                .iter()
                .map(|p| p.instruction())
                .collect::<Vec<_>>()
                .join("\n\n")),
        }
    }

    /// Format fields that could not be extracted.
    pub fn format_failures(&self, failures: &[FieldFailure]) -> String {
        failures
            .iter()
            .map(|f| self.warning(&format!("{} not extracted: {}", f.field, f.reason)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Format the saved artifact location.
    pub fn generated(&self, output_path: &Path) -> String {
        match self.format {
            OutputFormat::Table => {
                self.success(&format!("Factsheet saved to {}", output_path.display()))
            }
            OutputFormat::Json => serde_json::json!({ "output": output_path.display().to_string() }).to_string(),
            OutputFormat::Quiet => output_path.display().to_string(),
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn table(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut short: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    short.push('…');
    short
}
