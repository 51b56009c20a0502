//! Specs command implementation.

use crate::error::Result;
use crate::output::Formatter;
use crate::pipeline::Pipeline;
use factsheet_domain::{LlmProvider, SpecificationLoader};
use factsheet_prompts::PromptError;
use std::fmt::Display;

/// Execute the specs command.
pub fn execute_specs<S, L>(pipeline: &Pipeline<S, L>, formatter: &Formatter) -> Result<()>
where
    S: SpecificationLoader<Error = PromptError>,
    L: LlmProvider,
    L::Error: Display,
{
    let specs = pipeline.specifications()?;
    let specs: Vec<_> = specs.iter().collect();

    println!("{}", formatter.format_specs(&specs)?);
    Ok(())
}
