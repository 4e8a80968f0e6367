//! Benchmark orchestration.
//!
//! For every size, all trial texts are generated before any counting so each
//! model sees the same inputs. Output order mirrors input order:
//!
//! ```text
//! for size in sizes:
//!     texts = generate × trials
//!     for (provider, models) in provider_models:
//!         for model in models:
//!             RawSample { counts: [count(model, t) for t in texts] }
//! ```

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::stats::SummaryRecord;
use crate::config::{BenchConfig, RunConfig};
use crate::error::Result;
use crate::generator::generate_batch;
use crate::models::Provider;
use crate::tokenizer::CounterRegistry;

/// What to measure
#[derive(Debug, Clone)]
pub struct BenchPlan {
    /// Target character lengths, in order
    pub sizes: Vec<usize>,
    /// Texts per size
    pub trials: usize,
    /// Provider groups, in order
    pub provider_models: Vec<(Provider, Vec<String>)>,
    /// RNG seed
    pub seed: u64,
}

impl BenchPlan {
    /// Plan from a loaded configuration
    pub fn from_config(config: &BenchConfig) -> Self {
        Self {
            sizes: config.run.sizes.clone(),
            trials: config.run.trials,
            provider_models: config.provider_models(),
            seed: config.run.seed,
        }
    }

    /// Number of samples a run of this plan produces
    pub fn sample_count(&self) -> usize {
        let models: usize = self.provider_models.iter().map(|(_, m)| m.len()).sum();
        self.sizes.len() * models
    }

    fn validate(&self) -> Result<()> {
        RunConfig {
            sizes: self.sizes.clone(),
            trials: self.trials,
            seed: self.seed,
        }
        .validate()
    }
}

/// Token counts of one model over all trial texts of one size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSample {
    /// Target character length of every text
    pub size: usize,
    /// Provider
    pub provider: Provider,
    /// Model id
    pub model: String,
    /// One count per trial, in trial order
    pub counts: Vec<usize>,
}

impl RawSample {
    /// Size label used in reports, e.g. `"1024 chars"`
    pub fn size_label(&self) -> String {
        size_label(self.size)
    }

    /// Reduce to a summary record
    pub fn summarize(&self) -> Result<SummaryRecord> {
        SummaryRecord::from_counts(
            self.size_label(),
            self.provider,
            self.model.clone(),
            &self.counts,
            self.size,
        )
    }
}

/// Report label for a character size
pub fn size_label(size: usize) -> String {
    format!("{size} chars")
}

/// Drives generation and counting
pub struct BenchmarkRunner<'a> {
    registry: &'a CounterRegistry,
}

impl<'a> BenchmarkRunner<'a> {
    /// Runner counting with `registry`
    pub fn new(registry: &'a CounterRegistry) -> Self {
        Self { registry }
    }

    /// Collect raw samples for every (size, provider, model) in plan order
    ///
    /// The plan is validated up front; once counting starts the run always
    /// completes, since counters never fail.
    pub fn run(&self, plan: &BenchPlan) -> Result<Vec<RawSample>> {
        plan.validate()?;

        let mut rng = StdRng::seed_from_u64(plan.seed);
        let mut samples = Vec::with_capacity(plan.sample_count());

        for &size in &plan.sizes {
            tracing::info!("Measuring {} ({} trials)", size_label(size), plan.trials);
            let texts = generate_batch(size, plan.trials, &mut rng)?;

            for (provider, models) in &plan.provider_models {
                let counter = self.registry.counter(*provider);
                for model in models {
                    let counts: Vec<usize> =
                        texts.iter().map(|text| counter.count(model, text)).collect();
                    tracing::debug!(
                        size,
                        provider = provider.name(),
                        model = model.as_str(),
                        ?counts,
                        "Sample collected"
                    );
                    samples.push(RawSample {
                        size,
                        provider: *provider,
                        model: model.clone(),
                        counts,
                    });
                }
            }
        }

        Ok(samples)
    }

    /// Run the plan and summarize every sample, preserving order
    pub fn run_and_summarize(&self, plan: &BenchPlan) -> Result<Vec<SummaryRecord>> {
        self.run(plan)?.iter().map(RawSample::summarize).collect()
    }
}
