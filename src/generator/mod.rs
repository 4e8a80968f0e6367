//! Deterministic lorem ipsum text generation.
//!
//! Texts are built from [`LOREM_WORDS`] by drawing words uniformly with
//! replacement, joining them with single spaces until the target length is
//! reached, then truncating to exactly that length (possibly mid-word).
//!
//! The RNG is always supplied by the caller, so a fixed seed and call order
//! reproduce the same texts.
//!
//! # Example
//!
//! ```
//! use rand::{rngs::StdRng, SeedableRng};
//! use token_bench::generator::generate;
//!
//! let mut rng = StdRng::seed_from_u64(17);
//! let text = generate(64, &mut rng).unwrap();
//! assert_eq!(text.len(), 64);
//! ```

use rand::Rng;

use crate::error::{BenchError, Result};

/// Word corpus for generated texts
///
/// Repeated words (`ut`, `in`, `dolor`, `dolore`) are intentional: they
/// weight the draw toward the common words of the classic passage.
pub const LOREM_WORDS: [&str; 69] = [
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit", "sed", "do",
    "eiusmod", "tempor", "incididunt", "ut", "labore", "et", "dolore", "magna", "aliqua", "ut",
    "enim", "ad", "minim", "veniam", "quis", "nostrud", "exercitation", "ullamco", "laboris",
    "nisi", "ut", "aliquip", "ex", "ea", "commodo", "consequat", "duis", "aute", "irure", "dolor",
    "in", "reprehenderit", "in", "voluptate", "velit", "esse", "cillum", "dolore", "eu", "fugiat",
    "nulla", "pariatur", "excepteur", "sint", "occaecat", "cupidatat", "non", "proident", "sunt",
    "in", "culpa", "qui", "officia", "deserunt", "mollit", "anim", "id", "est", "laborum",
];

/// Generate exactly `target_chars` characters of lorem ipsum text
///
/// Fails only if `target_chars` is zero.
pub fn generate<R: Rng + ?Sized>(target_chars: usize, rng: &mut R) -> Result<String> {
    if target_chars == 0 {
        return Err(BenchError::InvalidParameter(
            "target_chars must be positive".to_string(),
        ));
    }

    let mut text = String::with_capacity(target_chars + 16);
    while text.len() < target_chars {
        let word = LOREM_WORDS[rng.gen_range(0..LOREM_WORDS.len())];
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(word);
    }

    // Corpus is ASCII, so byte length equals character length
    text.truncate(target_chars);
    Ok(text)
}

/// Generate `trials` texts of `target_chars` characters each, in draw order
pub fn generate_batch<R: Rng + ?Sized>(
    target_chars: usize,
    trials: usize,
    rng: &mut R,
) -> Result<Vec<String>> {
    (0..trials).map(|_| generate(target_chars, rng)).collect()
}
