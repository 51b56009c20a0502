//! Factsheet CLI - Draft clinical trial factsheets from study protocols.

use clap::Parser;
use factsheet_cli::commands;
use factsheet_cli::logging::init_logging;
use factsheet_cli::{Cli, Command, Config, Formatter, Pipeline};
use tracing::debug;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> factsheet_cli::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(prompt_dir) = cli.prompts {
        config.paths.prompt_dir = prompt_dir;
    }
    config.validate()?;

    if let Some(log_file) = init_logging(&config.logging.level, config.paths.log_dir.as_deref())? {
        debug!("Logging to {}", log_file.display());
    }

    let formatter = Formatter::new(cli.format.into(), !cli.no_color);

    match cli.command {
        Command::Specs => {
            commands::execute_specs(&Pipeline::offline(&config), &formatter)?;
        }
        Command::Compile(args) => {
            commands::execute_compile(args, &Pipeline::offline(&config), &formatter)?;
        }
        Command::Extract(args) => {
            let pipeline = Pipeline::from_config(&config)?;
            commands::execute_extract(args, &pipeline, &formatter)?;
        }
        Command::Generate(args) => {
            let pipeline = Pipeline::from_config(&config)?;
            commands::execute_generate(args, &config, &pipeline, &formatter)?;
        }
    }

    Ok(())
}
