//! Extract command implementation.

use crate::cli::InputArgs;
use crate::error::Result;
use crate::output::{Formatter, OutputFormat};
use crate::pipeline::Pipeline;
use factsheet_domain::{LlmProvider, SpecificationLoader};
use factsheet_prompts::PromptError;
use std::fmt::Display;

/// Execute the extract command.
pub fn execute_extract<S, L>(args: InputArgs, pipeline: &Pipeline<S, L>, formatter: &Formatter) -> Result<()>
where
    S: SpecificationLoader<Error = PromptError>,
    L: LlmProvider,
    L::Error: Display,
{
    let outcome = pipeline.extract(&args.input)?;

    println!("{}", formatter.format_record(&outcome.record)?);
    if !outcome.failures.is_empty() {
        eprintln!("{}", formatter.format_failures(&outcome.failures));
    }
    if formatter.format() == OutputFormat::Table {
        eprintln!(
            "{}",
            formatter.info(&format!(
                "{}/{} fields extracted with {} in {} ms",
                outcome.metadata.fields_succeeded,
                outcome.metadata.fields_attempted,
                outcome.metadata.model_name,
                outcome.metadata.processing_time_ms
            ))
        );
    }
    Ok(())
}
