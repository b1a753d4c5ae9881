mod cli;
mod commands;
mod config;
mod engine;
mod importer;
mod model;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use std::io;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    match cli.command {
        Command::Converge(args) => commands::converge::run(&cli.config, args),
        Command::Validate => commands::validate::run(&cli.config),
        Command::Show => commands::show::run(&cli.config),
        Command::Completions { shell } => {
            generate(shell, &mut Cli::command(), "backpack", &mut io::stdout());
            Ok(())
        }
    }
}
