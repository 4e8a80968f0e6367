//! Tokenizer encoding types and model-id resolution.

use serde::{Deserialize, Serialize};
use tiktoken_rs::tokenizer::{get_tokenizer, Tokenizer};

/// Tokenizer encoding type
///
/// Different models use different tokenizers. The encoding type determines
/// which BPE table is used for local token counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    /// OpenAI cl100k_base encoding (GPT-3.5, GPT-4); also the Claude approximation
    #[default]
    Cl100kBase,
    /// OpenAI o200k_base encoding (GPT-4o, o1, o3, GPT-5)
    O200kBase,
    /// OpenAI p50k_base encoding (Codex, text-davinci-002/003)
    P50kBase,
    /// OpenAI p50k_edit encoding (edit models)
    P50kEdit,
    /// OpenAI r50k_base encoding (GPT-3, GPT-2)
    R50kBase,
    /// Heuristic fallback (~4 characters per token)
    Heuristic,
}

impl Encoding {
    /// Newest general-purpose encoding, tried first for unknown models
    pub const NEWER_GENERAL: Encoding = Encoding::O200kBase;

    /// Older general-purpose encoding, tried when the newer one is unavailable
    pub const OLDER_GENERAL: Encoding = Encoding::Cl100kBase;

    /// Direct encoding for a model id, when tiktoken knows the model
    ///
    /// Provider prefixes such as `openai/` are stripped before lookup.
    ///
    /// # Examples
    /// ```
    /// use token_bench::models::Encoding;
    ///
    /// assert_eq!(Encoding::for_model("gpt-4o"), Some(Encoding::O200kBase));
    /// assert_eq!(Encoding::for_model("gpt-4"), Some(Encoding::Cl100kBase));
    /// assert_eq!(Encoding::for_model("not-a-real-model"), None);
    /// ```
    pub fn for_model(model: &str) -> Option<Self> {
        let model = model.rsplit('/').next().unwrap_or(model);
        get_tokenizer(model).and_then(Self::from_tiktoken)
    }

    #[allow(unreachable_patterns)]
    fn from_tiktoken(tokenizer: Tokenizer) -> Option<Self> {
        match tokenizer {
            Tokenizer::O200kBase => Some(Encoding::O200kBase),
            Tokenizer::Cl100kBase => Some(Encoding::Cl100kBase),
            Tokenizer::P50kBase => Some(Encoding::P50kBase),
            Tokenizer::P50kEdit => Some(Encoding::P50kEdit),
            Tokenizer::R50kBase | Tokenizer::Gpt2 => Some(Encoding::R50kBase),
            _ => None,
        }
    }

    /// Get encoding name as string
    pub fn name(&self) -> &'static str {
        match self {
            Encoding::Cl100kBase => "cl100k_base",
            Encoding::O200kBase => "o200k_base",
            Encoding::P50kBase => "p50k_base",
            Encoding::P50kEdit => "p50k_edit",
            Encoding::R50kBase => "r50k_base",
            Encoding::Heuristic => "heuristic",
        }
    }
}
