//! # token-bench - Tokenizer Token Count Benchmarks
//!
//! Measures how many tokens different LLM tokenizers produce for the same
//! synthetic text, across a ladder of character lengths, and summarizes the
//! per-trial counts statistically.
//!
//! ## Pipeline
//!
//! ```text
//!   seed ──> Generator ──> trial texts (per size, shared by every model)
//!                               │
//!                               v
//!                        CounterRegistry
//!                 openai: local tiktoken encoding
//!              anthropic: live count_tokens API / cl100k_base approximation
//!                               │
//!                               v
//!                   RawSample (counts per trial)
//!                               │
//!                               v
//!                summarize ──> SummaryRecord ──> table / CSV / JSON
//! ```
//!
//! ## Counting Modes
//!
//! | Provider  | Credential | Mode        | Source                           |
//! |-----------|------------|-------------|----------------------------------|
//! | openai    | n/a        | local       | tiktoken encoding for the model  |
//! | anthropic | present    | live        | Count Tokens API, per-call fallback |
//! | anthropic | absent     | approximate | cl100k_base                      |
//!
//! ## Quick Start
//!
//! ```
//! use token_bench::bench::{BenchPlan, BenchmarkRunner};
//! use token_bench::models::Provider;
//! use token_bench::report::render_table;
//! use token_bench::tokenizer::CounterRegistry;
//!
//! let registry = CounterRegistry::offline();
//! let plan = BenchPlan {
//!     sizes: vec![256, 512],
//!     trials: 2,
//!     provider_models: vec![(Provider::OpenAI, vec!["gpt-4o".to_string()])],
//!     seed: 17,
//! };
//!
//! let records = BenchmarkRunner::new(&registry).run_and_summarize(&plan).unwrap();
//! println!("{}", render_table(&records));
//! ```
//!
//! ## Modules
//!
//! - [`generator`]: Seeded lorem ipsum text of exact length
//! - [`tokenizer`]: Local encodings, live client, counter registry
//! - [`bench`]: Runner and statistics summarizer
//! - [`report`]: Table, CSV and JSON output
//! - [`models`]: Provider and encoding metadata
//! - [`config`]: Configuration management
//! - [`error`]: Error types and result aliases

pub mod bench;
pub mod config;
pub mod error;
pub mod generator;
pub mod models;
pub mod report;
pub mod tokenizer;

// Re-exports for convenience
pub use bench::{summarize, BenchPlan, BenchmarkRunner, RawSample, SummaryRecord, TokenStats};
pub use config::BenchConfig;
pub use error::{BenchError, Result};
pub use generator::generate;
pub use models::{Encoding, Provider};
pub use tokenizer::{CounterMode, CounterRegistry, TokenCounter};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
