//! Generate command implementation.

use crate::cli::GenerateArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use crate::pipeline::Pipeline;
use factsheet_documents::{cleanup_upload, stage_upload};
use factsheet_domain::{LlmProvider, SpecificationLoader};
use factsheet_prompts::PromptError;
use std::fmt::Display;

/// Execute the generate command.
///
/// With `--stage` the input is copied into the upload directory first and
/// the copy is removed afterwards, whether or not generation succeeded.
pub fn execute_generate<S, L>(
    args: GenerateArgs,
    config: &Config,
    pipeline: &Pipeline<S, L>,
    formatter: &Formatter,
) -> Result<()>
where
    S: SpecificationLoader<Error = PromptError>,
    L: LlmProvider,
    L::Error: Display,
{
    let template = args.template.unwrap_or_else(|| config.template_path());
    let output = args.output.unwrap_or_else(|| config.output_path());

    let report = if args.stage {
        let staged = stage_upload(&args.input, &config.paths.upload_dir)?;
        let result = pipeline.generate(&staged, &template, &output);
        cleanup_upload(&staged);
        result?
    } else {
        pipeline.generate(&args.input, &template, &output)?
    };

    if !report.outcome.failures.is_empty() {
        eprintln!("{}", formatter.format_failures(&report.outcome.failures));
    }
    println!("{}", formatter.generated(&report.output_path));
    Ok(())
}
