//! Token counting.
//!
//! This module provides local token counting using tiktoken encodings and
//! live counting through the Anthropic Count Tokens API, bound per provider
//! by [`CounterRegistry`].
//!
//! # Supported Encodings
//!
//! - **o200k_base**: GPT-4o, o1, o3, GPT-5 (and the fallback for unknown models)
//! - **cl100k_base**: GPT-3.5, GPT-4, Claude (approximate)
//! - **p50k_base / p50k_edit / r50k_base**: legacy OpenAI models
//! - **heuristic**: ~4 characters per token, used only if no table loads
//!
//! # Example
//!
//! ```
//! use token_bench::tokenizer::{CounterMode, CounterRegistry};
//! use token_bench::models::Provider;
//!
//! // No credential: Anthropic counts are approximated locally
//! let registry = CounterRegistry::offline();
//! assert_eq!(registry.counter(Provider::Anthropic).mode(), CounterMode::Approximate);
//!
//! let tokens = registry.count(Provider::OpenAI, "gpt-4o", "lorem ipsum dolor");
//! assert!(tokens > 0);
//! ```

mod anthropic;
mod counter;
mod encoder;

pub use anthropic::{AnthropicClient, CountTokensApi};
pub use counter::{
    CounterBinding, CounterMode, CounterRegistry, LiveCounter, LiveStats, TokenCounter,
    APPROXIMATION_ENCODING,
};
pub use encoder::{bpe, count_tokens_for_model, count_tokens_with_encoding, resolve_encoding};
