//! Statistics over per-trial token counts.
//!
//! Percentiles are direct index picks into the ascending-sorted counts, not
//! interpolated values:
//!
//! - p50 = `sorted[n / 2]` (upper-middle element for even `n`)
//! - p95 = `sorted[max(0, ceil(0.95 * n) - 1)]`

use serde::Serialize;

use crate::error::{BenchError, Result};
use crate::models::Provider;

/// Distribution of token counts for one sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TokenStats {
    /// Number of counts summarized
    pub num_trials: usize,
    /// Arithmetic mean
    pub mean_tokens: f64,
    /// Element at index `n / 2` of the sorted counts
    pub p50_tokens: f64,
    /// Element at index `ceil(0.95 n) - 1` of the sorted counts
    pub p95_tokens: f64,
    /// Population standard deviation
    pub stdev_tokens: f64,
    /// Mean tokens per 1000 characters of input
    pub mean_tokens_per_1k_chars: f64,
}

/// Summarize `counts` measured on texts of `char_count` characters
///
/// Fails on an empty sample or a zero character count; never yields NaN.
///
/// # Example
/// ```
/// use token_bench::bench::summarize;
///
/// let stats = summarize(&[10, 20, 30, 40], 1000).unwrap();
/// assert_eq!(stats.mean_tokens, 25.0);
/// assert_eq!(stats.p50_tokens, 30.0);
/// assert_eq!(stats.p95_tokens, 40.0);
/// ```
pub fn summarize(counts: &[usize], char_count: usize) -> Result<TokenStats> {
    if counts.is_empty() {
        return Err(BenchError::EmptySample);
    }
    if char_count == 0 {
        return Err(BenchError::InvalidParameter(
            "char_count must be positive".to_string(),
        ));
    }

    let mut sorted = counts.to_vec();
    sorted.sort_unstable();

    let n = sorted.len();
    let mean = sorted.iter().map(|&c| c as f64).sum::<f64>() / n as f64;

    let p50 = sorted[n / 2];
    let p95_index = ((0.95 * n as f64).ceil() as usize).saturating_sub(1);
    let p95 = sorted[p95_index.min(n - 1)];

    let stdev = if n > 1 {
        let variance = sorted
            .iter()
            .map(|&c| {
                let d = c as f64 - mean;
                d * d
            })
            .sum::<f64>()
            / n as f64;
        variance.sqrt()
    } else {
        0.0
    };

    Ok(TokenStats {
        num_trials: n,
        mean_tokens: mean,
        p50_tokens: p50 as f64,
        p95_tokens: p95 as f64,
        stdev_tokens: stdev,
        mean_tokens_per_1k_chars: mean / (char_count as f64 / 1000.0),
    })
}

/// Summary row for one (size, provider, model)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRecord {
    /// Size label, e.g. `"1024 chars"`
    pub size_label: String,
    /// Provider
    pub provider: Provider,
    /// Model id
    pub model: String,
    /// Count distribution
    #[serde(flatten)]
    pub stats: TokenStats,
}

impl SummaryRecord {
    /// Summarize counts into a labelled record
    pub fn from_counts(
        size_label: impl Into<String>,
        provider: Provider,
        model: impl Into<String>,
        counts: &[usize],
        char_count: usize,
    ) -> Result<Self> {
        Ok(Self {
            size_label: size_label.into(),
            provider,
            model: model.into(),
            stats: summarize(counts, char_count)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_index_percentiles_even() {
        let stats = summarize(&[40, 10, 30, 20], 100).unwrap();
        assert_eq!(stats.p50_tokens, 30.0);
        assert_eq!(stats.p95_tokens, 40.0);
        assert_eq!(stats.num_trials, 4);
    }

    #[test]
    fn test_index_percentiles_odd() {
        let stats = summarize(&[5, 1, 3], 100).unwrap();
        assert_eq!(stats.p50_tokens, 3.0);
        // ceil(2.85) - 1 = 2
        assert_eq!(stats.p95_tokens, 5.0);
    }

    #[test]
    fn test_p95_index_for_twenty() {
        let counts: Vec<usize> = (1..=20).collect();
        let stats = summarize(&counts, 1000).unwrap();
        // ceil(19.0) - 1 = 18
        assert_eq!(stats.p95_tokens, 19.0);
        assert_eq!(stats.p50_tokens, 11.0);
    }

    #[test]
    fn test_single_count() {
        let stats = summarize(&[57], 256).unwrap();
        assert_eq!(stats.mean_tokens, 57.0);
        assert_eq!(stats.p50_tokens, 57.0);
        assert_eq!(stats.p95_tokens, 57.0);
        assert_eq!(stats.stdev_tokens, 0.0);
    }

    #[test]
    fn test_population_stdev() {
        // Population stdev of [2, 4, 4, 4, 5, 5, 7, 9] is exactly 2
        let stats = summarize(&[2, 4, 4, 4, 5, 5, 7, 9], 1000).unwrap();
        assert_eq!(stats.mean_tokens, 5.0);
        assert!((stats.stdev_tokens - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_per_1k_chars() {
        let stats = summarize(&[30, 30, 30], 100).unwrap();
        assert_eq!(stats.mean_tokens_per_1k_chars, 300.0);

        let stats = summarize(&[512], 2048).unwrap();
        assert_eq!(stats.mean_tokens_per_1k_chars, 250.0);
    }

    #[test]
    fn test_empty_counts_fail_fast() {
        let err = summarize(&[], 100).unwrap_err();
        assert!(matches!(err, BenchError::EmptySample));
        assert!(err.is_precondition());
    }

    #[test]
    fn test_zero_chars_rejected() {
        let err = summarize(&[1, 2], 0).unwrap_err();
        assert!(matches!(err, BenchError::InvalidParameter(_)));
    }

    #[test]
    fn test_record_serializes_flat() {
        let record =
            SummaryRecord::from_counts("100 chars", Provider::OpenAI, "gpt-4o", &[20, 22], 100)
                .unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["provider"], "openai");
        assert_eq!(json["num_trials"], 2);
        assert_eq!(json["mean_tokens"], 21.0);
    }

    proptest! {
        #[test]
        fn prop_stdev_non_negative(counts in prop::collection::vec(0usize..10_000, 1..50)) {
            let stats = summarize(&counts, 1000).unwrap();
            prop_assert!(stats.stdev_tokens >= 0.0);
            prop_assert!(stats.mean_tokens.is_finite());
        }

        #[test]
        fn prop_constant_counts_have_zero_stdev(value in 0usize..10_000, n in 1usize..40) {
            let stats = summarize(&vec![value; n], 500).unwrap();
            prop_assert_eq!(stats.stdev_tokens, 0.0);
            prop_assert_eq!(stats.mean_tokens, value as f64);
        }

        #[test]
        fn prop_summarize_is_idempotent(
            counts in prop::collection::vec(0usize..10_000, 1..50),
            chars in 1usize..10_000,
        ) {
            let a = summarize(&counts, chars).unwrap();
            let b = summarize(&counts, chars).unwrap();
            prop_assert_eq!(a.mean_tokens.to_bits(), b.mean_tokens.to_bits());
            prop_assert_eq!(a.stdev_tokens.to_bits(), b.stdev_tokens.to_bits());
            prop_assert_eq!(a.mean_tokens_per_1k_chars.to_bits(), b.mean_tokens_per_1k_chars.to_bits());
            prop_assert_eq!(a, b);
        }

        #[test]
        fn prop_doubling_counts_doubles_rate(
            counts in prop::collection::vec(0usize..10_000, 1..50),
            chars in 1usize..10_000,
        ) {
            let doubled: Vec<usize> = counts.iter().map(|c| c * 2).collect();
            let a = summarize(&counts, chars).unwrap();
            let b = summarize(&doubled, chars).unwrap();
            let expected = a.mean_tokens_per_1k_chars * 2.0;
            prop_assert!((b.mean_tokens_per_1k_chars - expected).abs() <= expected.abs() * 1e-12);
        }

        #[test]
        fn prop_percentiles_are_sample_members(counts in prop::collection::vec(0usize..1000, 1..50)) {
            let stats = summarize(&counts, 1000).unwrap();
            prop_assert!(counts.iter().any(|&c| c as f64 == stats.p50_tokens));
            prop_assert!(counts.iter().any(|&c| c as f64 == stats.p95_tokens));
            prop_assert!(stats.p50_tokens <= stats.p95_tokens);
        }
    }
}
