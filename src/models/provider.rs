//! Tokenizer provider categorization.

use std::fmt;

use serde::{Deserialize, Serialize};

/// LLM provider whose tokenizer is being measured
///
/// The two providers differ in how counts are obtained:
/// - OpenAI tokenizers are public and computed locally via tiktoken.
/// - Anthropic tokenizers are only reachable through the Count Tokens API;
///   without a credential they are approximated with `cl100k_base`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// OpenAI models (GPT-5, GPT-4o, GPT-4) - local tiktoken encodings
    OpenAI,
    /// Anthropic models (Claude) - live Count Tokens API with local fallback
    Anthropic,
}

impl Provider {
    /// All providers in default reporting order
    pub const ALL: [Provider; 2] = [Provider::OpenAI, Provider::Anthropic];

    /// Lowercase identifier used in reports and CSV rows
    ///
    /// # Examples
    /// ```
    /// use token_bench::models::Provider;
    ///
    /// assert_eq!(Provider::OpenAI.name(), "openai");
    /// assert_eq!(Provider::Anthropic.name(), "anthropic");
    /// ```
    pub fn name(&self) -> &'static str {
        match self {
            Provider::OpenAI => "openai",
            Provider::Anthropic => "anthropic",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
