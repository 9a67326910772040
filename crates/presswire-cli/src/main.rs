//! Presswire CLI - process sports articles from the command line.

use clap::Parser;
use presswire_cli::commands::{self, Outcome};
use presswire_cli::{Cli, Command};
use tracing_subscriber::EnvFilter;

fn main() {
    match run() {
        Ok(outcome) => {
            println!("{}", outcome.output);
            if !outcome.success {
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn run() -> anyhow::Result<Outcome> {
    let cli = Cli::parse();
    let config = commands::load_config(&cli)?;

    // Log to stderr so stdout stays parseable with --json
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Command::Run(args) => commands::execute_run(args, &config),
        Command::Sample(args) => commands::execute_sample(args, &config),
        Command::Stats(args) => commands::execute_stats(args, &config),
    }
}
