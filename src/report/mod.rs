//! Result reporting: console table, CSV export, JSON report.
//!
//! All three consume [`SummaryRecord`]s in runner order and never reorder
//! them. The table rounds for display; the CSV keeps four decimals.

use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::bench::{BenchPlan, SummaryRecord};
use crate::error::Result;
use crate::models::{Encoding, Provider};
use crate::tokenizer::{CounterBinding, CounterRegistry};

/// CSV header, in column order
pub const CSV_HEADER: [&str; 9] = [
    "size_label",
    "provider",
    "model",
    "num_trials",
    "mean_tokens",
    "p50_tokens",
    "p95_tokens",
    "stdev_tokens",
    "mean_tokens_per_1k_chars",
];

/// Render records as a fixed-width table
pub fn render_table(records: &[SummaryRecord]) -> String {
    let header = format!(
        "{:>10}  {:>9}  {:<30}  {:>6}  {:>10}  {:>6}  {:>6}  {:>7}  {:>14}",
        "Size", "Provider", "Model", "Trials", "MeanTokens", "P50", "P95", "Stdev", "MeanTok/1kChars"
    );
    let mut out = String::new();
    out.push_str(&header);
    out.push('\n');
    out.push_str(&"-".repeat(header.len()));
    out.push('\n');

    for r in records {
        let s = &r.stats;
        out.push_str(&format!(
            "{:>10}  {:>9}  {:<30}  {:>6}  {:>10.1}  {:>6.0}  {:>6.0}  {:>7.1}  {:>14.1}\n",
            r.size_label,
            r.provider.name(),
            r.model,
            s.num_trials,
            s.mean_tokens,
            s.p50_tokens,
            s.p95_tokens,
            s.stdev_tokens,
            s.mean_tokens_per_1k_chars,
        ));
    }
    out
}

/// Write records as CSV to any writer
pub fn write_csv<W: Write>(records: &[SummaryRecord], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADER)?;
    for r in records {
        let s = &r.stats;
        wtr.write_record([
            r.size_label.clone(),
            r.provider.name().to_string(),
            r.model.clone(),
            s.num_trials.to_string(),
            format!("{:.4}", s.mean_tokens),
            format!("{:.4}", s.p50_tokens),
            format!("{:.4}", s.p95_tokens),
            format!("{:.4}", s.stdev_tokens),
            format!("{:.4}", s.mean_tokens_per_1k_chars),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write records as CSV to `path`, replacing any existing file
pub fn write_csv_file(records: &[SummaryRecord], path: impl AsRef<Path>) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_csv(records, std::io::BufWriter::new(file))
}

/// Local encoding behind one model's counts
#[derive(Debug, Clone, Serialize)]
pub struct ModelEncoding {
    /// Provider
    pub provider: Provider,
    /// Model id
    pub model: String,
    /// Encoding used locally (the fallback encoding for live counters)
    pub encoding: Encoding,
}

/// Complete run report for JSON export
#[derive(Debug, Clone, Serialize)]
pub struct BenchReport {
    /// Report creation time
    pub generated_at: DateTime<Utc>,
    /// RNG seed
    pub seed: u64,
    /// Texts per size
    pub trials: usize,
    /// Measured sizes, in order
    pub sizes: Vec<usize>,
    /// Counter binding per provider
    pub counters: Vec<CounterBinding>,
    /// Local encoding per model
    pub encodings: Vec<ModelEncoding>,
    /// Summary rows, in runner order
    pub results: Vec<SummaryRecord>,
}

impl BenchReport {
    /// Assemble a report for a finished run
    pub fn new(plan: &BenchPlan, registry: &CounterRegistry, results: Vec<SummaryRecord>) -> Self {
        let encodings = plan
            .provider_models
            .iter()
            .flat_map(|(provider, models)| {
                let counter = registry.counter(*provider);
                models.iter().map(move |model| ModelEncoding {
                    provider: *provider,
                    model: model.clone(),
                    encoding: counter.local_encoding(model),
                })
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            seed: plan.seed,
            trials: plan.trials,
            sizes: plan.sizes.clone(),
            counters: registry.bindings(),
            encodings,
            results,
        }
    }

    /// Write the report as pretty-printed JSON to any writer
    pub fn write_json<W: Write>(&self, mut writer: W) -> Result<()> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Write the report as pretty-printed JSON to `path`
    pub fn write_json_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        self.write_json(std::io::BufWriter::new(file))
    }
}
