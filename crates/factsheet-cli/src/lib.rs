//! Factsheet CLI library.
//!
//! Configuration, the end-to-end pipeline, command execution and output
//! formatting for the `factsheet` command-line tool.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod pipeline;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::{Formatter, OutputFormat};
pub use pipeline::{GenerationReport, ModelClient, Pipeline};
