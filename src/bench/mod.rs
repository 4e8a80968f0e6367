//! Benchmark runner and statistics.
//!
//! The runner turns a [`BenchPlan`] into ordered [`RawSample`]s; the
//! summarizer reduces each sample to a [`SummaryRecord`].
//!
//! # Example
//!
//! ```
//! use token_bench::bench::{BenchPlan, BenchmarkRunner};
//! use token_bench::models::Provider;
//! use token_bench::tokenizer::CounterRegistry;
//!
//! let registry = CounterRegistry::offline();
//! let plan = BenchPlan {
//!     sizes: vec![100],
//!     trials: 3,
//!     provider_models: vec![(Provider::OpenAI, vec!["gpt-4o".to_string()])],
//!     seed: 17,
//! };
//!
//! let records = BenchmarkRunner::new(&registry).run_and_summarize(&plan).unwrap();
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].stats.num_trials, 3);
//! ```

mod runner;
mod stats;

pub use runner::{size_label, BenchPlan, BenchmarkRunner, RawSample};
pub use stats::{summarize, SummaryRecord, TokenStats};
