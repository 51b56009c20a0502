//! Compile command implementation.

use crate::cli::CompileArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::pipeline::Pipeline;
use factsheet_domain::{LlmProvider, SpecificationLoader};
use factsheet_prompts::PromptError;
use std::fmt::Display;

/// Execute the compile command.
///
/// No model calls are made.
pub fn execute_compile<S, L>(args: CompileArgs, pipeline: &Pipeline<S, L>, formatter: &Formatter) -> Result<()>
where
    S: SpecificationLoader<Error = PromptError>,
    L: LlmProvider,
    L::Error: Display,
{
    let mut prompts = pipeline.compile(&args.input)?;

    if let Some(field) = args.field {
        prompts.retain(|p| p.field_name() == field);
        if prompts.is_empty() {
            return Err(CliError::InvalidInput(format!(
                "No prompt specification named '{}'",
                field
            )));
        }
    }

    println!("{}", formatter.format_prompts(&prompts)?);
    Ok(())
}
