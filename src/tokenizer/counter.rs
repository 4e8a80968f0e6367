//! Per-provider token counters and the registry that binds them.
//!
//! A counter is bound once per provider when the registry is built:
//!
//! ```text
//!   openai     ──────────────────────────────> Local (encoding per model)
//!
//!   anthropic  ── credential + client ok ────> Live ──(call fails)──> cl100k_base
//!              └─ otherwise ─────────────────> Approximate (cl100k_base)
//! ```
//!
//! Counting never returns an error. A failed live call degrades that single
//! count to the approximation and is recorded in [`LiveStats`].

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use super::anthropic::{AnthropicClient, CountTokensApi};
use super::encoder::{count_tokens_with_encoding, resolve_encoding};
use crate::config::AnthropicConfig;
use crate::models::{Encoding, Provider};

/// Encoding used to approximate Claude token counts
pub const APPROXIMATION_ENCODING: Encoding = Encoding::Cl100kBase;

/// How a counter obtains its counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CounterMode {
    /// Remote service, with per-call local fallback
    Live,
    /// Fixed local encoding standing in for an unavailable tokenizer
    Approximate,
    /// Exact local encoding resolved per model
    Local,
}

impl CounterMode {
    /// Lowercase label for display
    pub fn name(&self) -> &'static str {
        match self {
            CounterMode::Live => "live",
            CounterMode::Approximate => "approximate",
            CounterMode::Local => "local",
        }
    }
}

/// Live call outcomes
#[derive(Debug, Default)]
pub struct LiveStats {
    live: AtomicU64,
    fallbacks: AtomicU64,
}

impl LiveStats {
    fn record_live(&self) {
        self.live.fetch_add(1, Ordering::Relaxed);
    }

    fn record_fallback(&self) {
        self.fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    /// Calls answered by the remote service
    pub fn live_calls(&self) -> u64 {
        self.live.load(Ordering::Relaxed)
    }

    /// Calls that failed and were answered by the approximation
    pub fn fallbacks(&self) -> u64 {
        self.fallbacks.load(Ordering::Relaxed)
    }
}

/// Remote counter that degrades to a local encoding on failure
pub struct LiveCounter {
    api: Box<dyn CountTokensApi>,
    fallback: Encoding,
    stats: LiveStats,
}

impl LiveCounter {
    /// Wrap a remote endpoint with a per-call fallback encoding
    pub fn new(api: Box<dyn CountTokensApi>, fallback: Encoding) -> Self {
        Self {
            api,
            fallback,
            stats: LiveStats::default(),
        }
    }

    /// Count remotely, or locally if the remote call fails
    pub fn count(&self, model: &str, text: &str) -> usize {
        match self.api.count_tokens(model, text) {
            Ok(tokens) => {
                self.stats.record_live();
                tokens
            },
            Err(e) => {
                tracing::debug!(model, "Live token count failed, using approximation: {e}");
                self.stats.record_fallback();
                count_tokens_with_encoding(text, self.fallback)
            },
        }
    }

    /// Live call outcomes so far
    pub fn stats(&self) -> &LiveStats {
        &self.stats
    }
}

impl std::fmt::Debug for LiveCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveCounter")
            .field("fallback", &self.fallback)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

/// A bound counting strategy
#[derive(Debug)]
pub enum TokenCounter {
    /// Exact local count with the encoding resolved from the model id
    Local,
    /// Local count with one fixed encoding for every model
    Approximate(Encoding),
    /// Remote count with per-call fallback
    Live(LiveCounter),
}

impl TokenCounter {
    /// Count tokens of `text` for `model`
    pub fn count(&self, model: &str, text: &str) -> usize {
        match self {
            TokenCounter::Local => count_tokens_with_encoding(text, resolve_encoding(model)),
            TokenCounter::Approximate(encoding) => count_tokens_with_encoding(text, *encoding),
            TokenCounter::Live(live) => live.count(model, text),
        }
    }

    /// Binding mode
    pub fn mode(&self) -> CounterMode {
        match self {
            TokenCounter::Local => CounterMode::Local,
            TokenCounter::Approximate(_) => CounterMode::Approximate,
            TokenCounter::Live(_) => CounterMode::Live,
        }
    }

    /// Local encoding used for `model` (the fallback encoding for live counters)
    pub fn local_encoding(&self, model: &str) -> Encoding {
        match self {
            TokenCounter::Local => resolve_encoding(model),
            TokenCounter::Approximate(encoding) => *encoding,
            TokenCounter::Live(live) => live.fallback,
        }
    }

    /// Live call outcomes, for live counters
    pub fn live_stats(&self) -> Option<&LiveStats> {
        match self {
            TokenCounter::Live(live) => Some(live.stats()),
            _ => None,
        }
    }
}

/// One provider's binding, for banners and reports
#[derive(Debug, Clone, Serialize)]
pub struct CounterBinding {
    /// Provider
    pub provider: Provider,
    /// Binding mode
    pub mode: CounterMode,
}

/// Token counters bound per provider for one run
#[derive(Debug)]
pub struct CounterRegistry {
    openai: TokenCounter,
    anthropic: TokenCounter,
}

impl CounterRegistry {
    /// Bind counters from configuration
    ///
    /// `config.api_key` must already be resolved (flag, config file, then
    /// environment, see [`crate::config::BenchConfig::with_api_key`]). Without a
    /// key, or if the client cannot be created, Anthropic counts are
    /// approximated for the whole run.
    pub fn new(config: &AnthropicConfig) -> Self {
        let anthropic = match config.api_key.as_deref().filter(|k| !k.is_empty()) {
            Some(key) => match AnthropicClient::new(config, key) {
                Ok(client) => {
                    tracing::debug!("Anthropic counts via {}", client.endpoint());
                    TokenCounter::Live(LiveCounter::new(
                        Box::new(client),
                        APPROXIMATION_ENCODING,
                    ))
                },
                Err(e) => {
                    tracing::warn!("Anthropic client unavailable, approximating counts: {e}");
                    TokenCounter::Approximate(APPROXIMATION_ENCODING)
                },
            },
            None => TokenCounter::Approximate(APPROXIMATION_ENCODING),
        };

        Self {
            openai: TokenCounter::Local,
            anthropic,
        }
    }

    /// Registry with no live counters
    pub fn offline() -> Self {
        Self::new(&AnthropicConfig::default())
    }

    /// Replace the counter bound to `provider`
    pub fn with_counter(mut self, provider: Provider, counter: TokenCounter) -> Self {
        match provider {
            Provider::OpenAI => self.openai = counter,
            Provider::Anthropic => self.anthropic = counter,
        }
        self
    }

    /// Counter bound to `provider`
    pub fn counter(&self, provider: Provider) -> &TokenCounter {
        match provider {
            Provider::OpenAI => &self.openai,
            Provider::Anthropic => &self.anthropic,
        }
    }

    /// Count tokens of `text` for `model` with the provider's counter
    pub fn count(&self, provider: Provider, model: &str, text: &str) -> usize {
        self.counter(provider).count(model, text)
    }

    /// Binding of every provider
    pub fn bindings(&self) -> Vec<CounterBinding> {
        Provider::ALL
            .iter()
            .map(|&provider| CounterBinding {
                provider,
                mode: self.counter(provider).mode(),
            })
            .collect()
    }
}
