//! Command execution.

use crate::cli::{Cli, RunArgs, SampleArgs, StatsArgs};
use crate::output::{render_result, render_stats};
use crate::provider::Backend;
use anyhow::{Context, Result};
use presswire_domain::ContentInput;
use presswire_gatekeeper::Gatekeeper;
use presswire_pipeline::{JsonLinesObserver, Pipeline, PipelineConfig, TracingObserver};
use presswire_router::Router;
use presswire_store::FileSink;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Config file read from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "presswire.toml";

/// Article processed by the `sample` command
pub const SAMPLE_ARTICLE: &str = "Manchester United secured a crucial 2-1 victory over Liverpool at Old Trafford \
on Saturday evening. Goals from Marcus Rashford and Bruno Fernandes sealed the \
win for the Red Devils, with Mohamed Salah scoring a consolation goal for the \
visitors in the 85th minute. The victory moves United to within three points \
of the top four in the Premier League standings. Manager Erik ten Hag praised \
his team's resilience and determination in what was a hard-fought derby match.";

/// Pipeline as assembled by the CLI
pub type CliPipeline = Pipeline<Backend, FileSink>;

/// What a command produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Text for stdout
    pub output: String,
    /// Whether the process should exit successfully
    pub success: bool,
}

/// Load configuration and apply command-line overrides.
pub fn load_config(cli: &Cli) -> Result<PipelineConfig> {
    let mut config = match &cli.config {
        Some(path) => PipelineConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => PipelineConfig::from_file(DEFAULT_CONFIG_FILE)
            .with_context(|| format!("Failed to load config from {}", DEFAULT_CONFIG_FILE))?,
        None => PipelineConfig::default(),
    };

    if let Some(provider) = cli.provider {
        config.llm.provider = provider.into();
    }
    if let Some(output_dir) = &cli.output_dir {
        config.router.output_dir = output_dir.clone();
    }
    config.validate()?;
    Ok(config)
}

/// Assemble the pipeline: backend, file sink, router and event observers.
pub fn build_pipeline(config: &PipelineConfig) -> Result<CliPipeline> {
    let backend = Backend::from_config(&config.llm).context("Failed to set up the LLM provider")?;

    let sink = FileSink::new(&config.router.output_dir);
    sink.prepare(config.router.all_buckets())
        .context("Failed to create output directories")?;
    let router = Router::new(sink, config.router.clone());

    let mut pipeline = Pipeline::new(
        Arc::new(backend),
        router,
        config.stages.clone(),
        Gatekeeper::new(config.validation.clone()),
    )
    .with_observer(TracingObserver);

    if let Some(path) = &config.logging.log_file {
        let observer = JsonLinesObserver::open(path)
            .with_context(|| format!("Failed to open event log {}", path.display()))?;
        pipeline = pipeline.with_observer(observer);
    }

    Ok(pipeline)
}

/// Read a batch file: a JSON array of `{content, input_id?, source?}`.
pub fn read_batch(path: &Path) -> Result<Vec<ContentInput>> {
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let inputs: Vec<ContentInput> = serde_json::from_str(&contents)
        .with_context(|| format!("{} is not a JSON array of content entries", path.display()))?;
    Ok(inputs)
}

/// Execute the run command.
///
/// Individual item failures are part of the report, not a command failure.
pub fn execute_run(args: &RunArgs, config: &PipelineConfig) -> Result<Outcome> {
    let inputs = read_batch(&args.input)?;
    info!(items = inputs.len(), input = %args.input.display(), "Starting batch");

    let pipeline = build_pipeline(config)?;
    let report = pipeline.process_batch(inputs);
    debug!(
        successful = report.summary.successful,
        failed = report.summary.failed,
        "Batch finished"
    );

    let output = if args.json {
        serde_json::to_string_pretty(&report)?
    } else {
        let mut sections: Vec<String> = report.results.iter().map(render_result).collect();
        sections.push(report.summary_text());
        sections.join("\n\n")
    };

    Ok(Outcome { output, success: true })
}

/// Execute the sample command.
pub fn execute_sample(args: &SampleArgs, config: &PipelineConfig) -> Result<Outcome> {
    let pipeline = build_pipeline(config)?;
    let input = ContentInput {
        content: SAMPLE_ARTICLE.to_string(),
        input_id: Some("sample_001".to_string()),
        source: Some("manual_test".to_string()),
    };
    let result = pipeline.process_input(input);

    let output = if args.json {
        serde_json::to_string_pretty(&result)?
    } else {
        render_result(&result)
    };

    Ok(Outcome {
        output,
        success: result.is_success(),
    })
}

/// Execute the stats command.
pub fn execute_stats(args: &StatsArgs, config: &PipelineConfig) -> Result<Outcome> {
    let router = Router::new(FileSink::new(&config.router.output_dir), config.router.clone());
    let stats = router
        .restore_stats()
        .with_context(|| format!("Failed to count records in {}", config.router.output_dir.display()))?;

    let output = if args.json {
        serde_json::to_string_pretty(&stats)?
    } else {
        render_stats(&stats)
    };

    Ok(Outcome { output, success: true })
}
