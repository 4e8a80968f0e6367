//! token-bench CLI binary.
//!
//! Generates lorem ipsum texts of several lengths, counts their tokens with
//! OpenAI (tiktoken) and Anthropic (Count Tokens API or approximation)
//! tokenizers, and prints summary statistics.
//!
//! Run examples:
//!
//! ```text
//! token-bench --sizes 256 512 1024 --trials 5 \
//!     --openai-models gpt-4o gpt-4o-mini gpt-4-turbo \
//!     --anthropic-models claude-3-5-sonnet-20240620 claude-3-5-haiku-20241022
//!
//! token-bench --sizes 2048 4096 8192 --trials 3 --csv out.csv
//! ```

use std::path::PathBuf;

use clap::Parser;
use token_bench::{
    bench::{BenchPlan, BenchmarkRunner},
    config::{BenchConfig, ANTHROPIC_API_KEY_ENV},
    models::Provider,
    report::{render_table, write_csv_file, BenchReport},
    tokenizer::CounterRegistry,
    VERSION,
};

#[derive(Parser)]
#[command(name = "token-bench")]
#[command(version = VERSION)]
#[command(about = "Estimate token counts for generated text across LLM tokenizers", long_about = None)]
struct Cli {
    /// Character sizes to generate and measure
    #[arg(long, num_args = 1..)]
    sizes: Option<Vec<usize>>,

    /// Number of random texts per size
    #[arg(long)]
    trials: Option<usize>,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// OpenAI models to evaluate (pass no values to skip OpenAI)
    #[arg(long, num_args = 0..)]
    openai_models: Option<Vec<String>>,

    /// Anthropic models to evaluate (pass no values to skip Anthropic)
    #[arg(long, num_args = 0..)]
    anthropic_models: Option<Vec<String>>,

    /// Anthropic API key. If omitted, uses ANTHROPIC_API_KEY; if neither is
    /// set, Anthropic counts are approximated
    #[arg(long)]
    anthropic_api_key: Option<String>,

    /// Anthropic API base URL
    #[arg(long)]
    anthropic_base_url: Option<String>,

    /// TOML config file (default: <config dir>/token-bench/config.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write results as CSV
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write a JSON report
    #[arg(long)]
    json: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so the table on stdout stays clean
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    let config = load_config(cli)?;
    config.validate()?;
    tracing::debug!(?config, "Configuration loaded");

    let registry = CounterRegistry::new(&config.anthropic);
    for binding in registry.bindings() {
        tracing::info!("{} counts: {}", binding.provider, binding.mode.name());
    }

    let plan = BenchPlan::from_config(&config);
    let records = BenchmarkRunner::new(&registry).run_and_summarize(&plan)?;

    println!();
    print!("{}", render_table(&records));

    if let Some(stats) = registry.counter(Provider::Anthropic).live_stats() {
        if stats.fallbacks() > 0 {
            println!(
                "\nNote: {} of {} Anthropic counts fell back to the cl100k_base approximation",
                stats.fallbacks(),
                stats.fallbacks() + stats.live_calls()
            );
        }
    }

    // Exports are best-effort: a failed write does not fail the run
    if let Some(path) = &config.output.csv {
        match write_csv_file(&records, path) {
            Ok(()) => println!("\nWrote CSV to {}", path.display()),
            Err(e) => tracing::warn!("Failed to write CSV to {}: {e}", path.display()),
        }
    }

    if let Some(path) = &config.output.json {
        let report = BenchReport::new(&plan, &registry, records);
        match report.write_json_file(path) {
            Ok(()) => println!("Wrote JSON report to {}", path.display()),
            Err(e) => tracing::warn!("Failed to write JSON to {}: {e}", path.display()),
        }
    }

    Ok(())
}

/// Defaults, then config file, then environment, then flags
fn load_config(cli: Cli) -> anyhow::Result<BenchConfig> {
    let config = match &cli.config {
        Some(path) => BenchConfig::from_file(path)?,
        None => BenchConfig::load_default()?,
    };
    let mut config = config.with_env_overrides()?;

    if let Some(sizes) = cli.sizes {
        config.run.sizes = sizes;
    }
    if let Some(trials) = cli.trials {
        config.run.trials = trials;
    }
    if let Some(seed) = cli.seed {
        config.run.seed = seed;
    }
    if let Some(models) = cli.openai_models {
        config.models.openai = models;
    }
    if let Some(models) = cli.anthropic_models {
        config.models.anthropic = models;
    }
    if let Some(url) = cli.anthropic_base_url {
        config.anthropic.base_url = url;
    }
    if cli.csv.is_some() {
        config.output.csv = cli.csv;
    }
    if cli.json.is_some() {
        config.output.json = cli.json;
    }

    let env_key = std::env::var(ANTHROPIC_API_KEY_ENV).ok();
    Ok(config.with_api_key(cli.anthropic_api_key.as_deref(), env_key.as_deref()))
}
