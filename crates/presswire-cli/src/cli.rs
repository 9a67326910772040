//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use presswire_pipeline::ProviderKind;
use std::path::PathBuf;

/// Presswire - classify sports articles, write headlines and file them by type.
#[derive(Debug, Parser)]
#[command(name = "presswire")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "PRESSWIRE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the configured LLM provider
    #[arg(short, long, value_enum, global = true)]
    pub provider: Option<ProviderArg>,

    /// Override the configured output directory
    #[arg(short, long, global = true)]
    pub output_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// LLM provider options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ProviderArg {
    /// Anthropic Messages API
    Anthropic,
    /// Local Ollama server
    Ollama,
    /// Canned offline replies
    Mock,
}

impl From<ProviderArg> for ProviderKind {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::Anthropic => ProviderKind::Anthropic,
            ProviderArg::Ollama => ProviderKind::Ollama,
            ProviderArg::Mock => ProviderKind::Mock,
        }
    }
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Process a JSON batch file
    Run(RunArgs),

    /// Process the built-in sample article
    Sample(SampleArgs),

    /// Count the records already in the output directory
    Stats(StatsArgs),
}

/// Arguments for the run command.
#[derive(Debug, Parser)]
pub struct RunArgs {
    /// JSON array of `{content, input_id?, source?}` entries
    #[arg(short, long)]
    pub input: PathBuf,

    /// Print the full report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the sample command.
#[derive(Debug, Parser)]
pub struct SampleArgs {
    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the stats command.
#[derive(Debug, Parser)]
pub struct StatsArgs {
    /// Print the counts as JSON
    #[arg(long)]
    pub json: bool,
}
