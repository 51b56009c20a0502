//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Factsheet - Draft clinical trial factsheets from study protocols.
#[derive(Debug, Parser)]
#[command(name = "factsheet")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true, default_value = "table")]
    pub format: CliFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "FACTSHEET_CONFIG")]
    pub config: Option<PathBuf>,

    /// Prompt specification directory (overrides configuration)
    #[arg(short, long, global = true)]
    pub prompts: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (values only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract fields from a document and render the factsheet
    Generate(GenerateArgs),

    /// Extract fields from a document and print them
    Extract(InputArgs),

    /// Print the compiled prompts for a document without calling the model
    Compile(CompileArgs),

    /// List the loaded prompt specifications
    Specs,
}

/// Arguments for the generate command.
#[derive(Debug, Parser)]
pub struct GenerateArgs {
    /// Input document (.pdf, .docx or .txt)
    pub input: PathBuf,

    /// Output template (overrides configuration)
    #[arg(short, long)]
    pub template: Option<PathBuf>,

    /// Output file (overrides configuration)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Copy the input into the upload directory and remove it afterwards
    #[arg(long)]
    pub stage: bool,
}

/// Arguments for commands that only need an input document.
#[derive(Debug, Parser)]
pub struct InputArgs {
    /// Input document (.pdf, .docx or .txt)
    pub input: PathBuf,
}

/// Arguments for the compile command.
#[derive(Debug, Parser)]
pub struct CompileArgs {
    /// Input document (.pdf, .docx or .txt)
    pub input: PathBuf,

    /// Only show the prompt for this field
    #[arg(long)]
    pub field: Option<String>,
}

impl From<CliFormat> for crate::output::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::output::OutputFormat::Table,
            CliFormat::Json => crate::output::OutputFormat::Json,
            CliFormat::Quiet => crate::output::OutputFormat::Quiet,
        }
    }
}
