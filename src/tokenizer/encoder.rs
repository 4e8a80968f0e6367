//! Local BPE token counting.
//!
//! Uses tiktoken-rs for BPE token counting with lazy-loaded encoders.
//! A table that fails to load is remembered as unavailable so resolution
//! can move on to the next encoding in the fallback chain.

use std::sync::OnceLock;
use tiktoken_rs::{cl100k_base, o200k_base, p50k_base, p50k_edit, r50k_base, CoreBPE};

use crate::models::Encoding;

// Lazy-loaded tokenizer instances (thread-safe singletons)
static CL100K: OnceLock<Option<CoreBPE>> = OnceLock::new();
static O200K: OnceLock<Option<CoreBPE>> = OnceLock::new();
static P50K: OnceLock<Option<CoreBPE>> = OnceLock::new();
static P50K_EDIT: OnceLock<Option<CoreBPE>> = OnceLock::new();
static R50K: OnceLock<Option<CoreBPE>> = OnceLock::new();

fn load<E: std::fmt::Display>(
    cell: &'static OnceLock<Option<CoreBPE>>,
    encoding: Encoding,
    init: fn() -> Result<CoreBPE, E>,
) -> Option<&'static CoreBPE> {
    cell.get_or_init(|| match init() {
        Ok(bpe) => Some(bpe),
        Err(e) => {
            tracing::warn!("Failed to load {} tokenizer: {e}", encoding.name());
            None
        },
    })
    .as_ref()
}

/// Get the BPE table for an encoding, or `None` if it cannot be loaded
///
/// [`Encoding::Heuristic`] has no table and always returns `None`.
pub fn bpe(encoding: Encoding) -> Option<&'static CoreBPE> {
    match encoding {
        Encoding::Cl100kBase => load(&CL100K, encoding, cl100k_base),
        Encoding::O200kBase => load(&O200K, encoding, o200k_base),
        Encoding::P50kBase => load(&P50K, encoding, p50k_base),
        Encoding::P50kEdit => load(&P50K_EDIT, encoding, p50k_edit),
        Encoding::R50kBase => load(&R50K, encoding, r50k_base),
        Encoding::Heuristic => None,
    }
}

/// Resolve the encoding used to count tokens for a model id
///
/// Order: the model's own encoding when tiktoken knows the model, then
/// `o200k_base`, then `cl100k_base`, then the character heuristic. Every
/// step is skipped if its table cannot be loaded, so this never fails.
///
/// # Example
/// ```
/// use token_bench::tokenizer::resolve_encoding;
/// use token_bench::models::Encoding;
///
/// assert_eq!(resolve_encoding("gpt-4-turbo"), Encoding::Cl100kBase);
/// assert_eq!(resolve_encoding("some-future-model"), Encoding::O200kBase);
/// ```
pub fn resolve_encoding(model: &str) -> Encoding {
    Encoding::for_model(model)
        .into_iter()
        .chain([Encoding::NEWER_GENERAL, Encoding::OLDER_GENERAL])
        .find(|encoding| bpe(*encoding).is_some())
        .unwrap_or(Encoding::Heuristic)
}

/// Count tokens with a specific encoding
///
/// Text is encoded as ordinary text; special-token markers are not
/// interpreted. Falls back to the heuristic if the table is unavailable.
///
/// # Example
/// ```
/// use token_bench::tokenizer::count_tokens_with_encoding;
/// use token_bench::models::Encoding;
///
/// let tokens = count_tokens_with_encoding("Hello, world!", Encoding::Cl100kBase);
/// assert!(tokens > 0 && tokens < 10);
///
/// // Unknown models use heuristic (~4 chars per token)
/// assert_eq!(count_tokens_with_encoding("Hello!", Encoding::Heuristic), 2);
/// ```
pub fn count_tokens_with_encoding(text: &str, encoding: Encoding) -> usize {
    match bpe(encoding) {
        Some(bpe) => bpe.encode_ordinary(text).len(),
        None => heuristic_count(text),
    }
}

/// Count tokens for a model id using its resolved local encoding
pub fn count_tokens_for_model(text: &str, model: &str) -> usize {
    count_tokens_with_encoding(text, resolve_encoding(model))
}

/// Heuristic token count (~4 characters per token)
fn heuristic_count(text: &str) -> usize {
    // Round up to avoid underestimating
    text.len().div_ceil(4)
}
