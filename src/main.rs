//! Knowledge Evals CLI
//!
//! Test and evaluation harness for the knowledge RAG tool.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use knowledge_evals::{
    config::Config,
    dataset::{DatasetSuite, builtin_suites},
    harness::Harness,
    llm::LlmClient,
    metrics::{MetricInputs, MetricReport},
    output::format_knowledge_output,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Knowledge Evals - test and evaluation harness for the knowledge RAG tool
#[derive(Parser)]
#[command(name = "knowledge-evals")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run evaluation suites against the knowledge tool
    Run {
        /// Only run the suite for this dataset
        #[arg(short, long)]
        dataset: Option<String>,

        /// Directory containing the source documents
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Load suites from a JSON file instead of the built-in set
        #[arg(short, long)]
        suites: Option<PathBuf>,

        /// Save the report to a JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compute RAG quality metrics for recorded answers
    Metrics {
        /// Path to a JSON file with questions/answers/contexts lists
        input: PathBuf,

        /// Save per-item scores to a JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Wrap retrieval tool output (from the OUTPUT env var) for model consumption
    FormatOutput,

    /// Test LLM connection
    Test,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            dataset,
            data_dir,
            suites,
            output,
        } => cmd_run(dataset, data_dir, suites, output).await,
        Commands::Metrics { input, output } => cmd_metrics(input, output).await,
        Commands::FormatOutput => cmd_format_output(),
        Commands::Test => cmd_test().await,
    }
}

async fn cmd_run(
    dataset: Option<String>,
    data_dir: PathBuf,
    suites_file: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    let mut suites = match suites_file {
        Some(path) => DatasetSuite::load_json(&path).context("Failed to load suites file")?,
        None => builtin_suites(&data_dir),
    };

    if let Some(name) = dataset {
        suites.retain(|s| s.dataset == name);
        if suites.is_empty() {
            anyhow::bail!("No suite found for dataset '{}'", name);
        }
    }

    println!(
        "Running {} suite(s) with judge model {}",
        suites.len(),
        config.llm.judge_model
    );

    let harness = Harness::new(&config);
    let report = harness.run_all(&suites).await;

    report.print_summary();

    if let Some(output_path) = output {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(&output_path, json)?;
        println!("Report saved to {:?}", output_path);
    }

    if !report.passed() {
        std::process::exit(1);
    }

    Ok(())
}

async fn cmd_metrics(input: PathBuf, output: Option<PathBuf>) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    let inputs = MetricInputs::load_json(&input).context("Failed to load metric inputs")?;
    println!(
        "Scoring {} item(s) with model {}",
        inputs.len(),
        config.llm.model
    );

    let client = LlmClient::new(config.llm, config.embedding);
    let report = MetricReport::compute(&client, &inputs).await?;

    report.print_summary();

    if let Some(output_path) = output {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(&output_path, json)?;
        println!("Scores saved to {:?}", output_path);
    }

    Ok(())
}

fn cmd_format_output() -> Result<()> {
    // Env access stays at the process boundary: the agent runtime hands the
    // tool output over in OUTPUT.
    let output = std::env::var("OUTPUT").unwrap_or_default();
    println!("{}", format_knowledge_output(&output));
    Ok(())
}

async fn cmd_test() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    println!("API base: {}", config.llm.api_base);
    println!("Model: {}", config.llm.model);

    let client = LlmClient::new(config.llm, config.embedding);
    client.test_connection().await?;

    println!("Connection OK");
    Ok(())
}
