//! Folio - content table and search index generator.

use clap::{ColorChoice, Parser};
use folio::{
    cli::{self, Cli, Commands},
    config::FolioConfig,
    log,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let result = FolioConfig::load(&cli).and_then(|config| match &cli.command {
        Commands::Build { .. } => cli::build::build_index(&config),
        Commands::Query { args } => cli::query::run_query(args, &config),
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log!("error"; "{:#}", err);
            ExitCode::FAILURE
        }
    }
}
