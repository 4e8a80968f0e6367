//! Configuration management.
//!
//! Supports configuration from:
//! - TOML config files
//! - Environment variables
//! - CLI arguments (applied by the binary on top of the above)
//!
//! Credentials are resolved here, once, and handed to the counter registry
//! as plain values. Nothing below this module reads the environment.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{BenchError, Result};
use crate::models::Provider;

/// Environment variable holding the Anthropic API key
pub const ANTHROPIC_API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Default character sizes to measure
pub const DEFAULT_SIZES: [usize; 6] = [256, 512, 1024, 2048, 4096, 8192];

/// Default trials per size
pub const DEFAULT_TRIALS: usize = 5;

/// Default RNG seed
pub const DEFAULT_SEED: u64 = 17;

/// Main configuration struct
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BenchConfig {
    /// Run parameters
    #[serde(default)]
    pub run: RunConfig,

    /// Models to measure per provider
    #[serde(default)]
    pub models: ModelsConfig,

    /// Anthropic live counting
    #[serde(default)]
    pub anthropic: AnthropicConfig,

    /// Export destinations
    #[serde(default)]
    pub output: OutputConfig,
}

impl BenchConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| BenchError::Config(format!("Failed to read config file: {e}")))?;

        Ok(toml::from_str(&content)?)
    }

    /// Default config file location (`<config_dir>/token-bench/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("token-bench").join("config.toml"))
    }

    /// Load the default config file if it exists, otherwise defaults
    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.is_file() => Self::from_file(path),
            _ => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Reads `TOKEN_BENCH_SIZES` (comma separated), `TOKEN_BENCH_TRIALS`,
    /// `TOKEN_BENCH_SEED` and `ANTHROPIC_BASE_URL`. Unparseable values are
    /// configuration errors. The API key is not read here; see
    /// [`BenchConfig::with_api_key`].
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    /// Settle the API key: flag, then config file, then environment
    ///
    /// Empty strings at any layer count as absent, so an empty flag does
    /// not hide a key from the config file.
    pub fn with_api_key(mut self, flag: Option<&str>, env: Option<&str>) -> Self {
        let file = self.anthropic.api_key.take();
        self.anthropic.api_key = resolve_api_key(&[flag, file.as_deref(), env]);
        self
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(sizes) = lookup("TOKEN_BENCH_SIZES") {
            self.run.sizes = sizes
                .split(',')
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(|s| {
                    s.parse::<usize>()
                        .map_err(|e| BenchError::Config(format!("TOKEN_BENCH_SIZES: {s}: {e}")))
                })
                .collect::<Result<Vec<usize>>>()?;
        }
        if let Some(trials) = lookup("TOKEN_BENCH_TRIALS") {
            self.run.trials = trials
                .trim()
                .parse::<usize>()
                .map_err(|e| BenchError::Config(format!("TOKEN_BENCH_TRIALS: {e}")))?;
        }
        if let Some(seed) = lookup("TOKEN_BENCH_SEED") {
            self.run.seed = seed
                .trim()
                .parse::<u64>()
                .map_err(|e| BenchError::Config(format!("TOKEN_BENCH_SEED: {e}")))?;
        }
        if let Some(url) = lookup("ANTHROPIC_BASE_URL") {
            self.anthropic.base_url = url;
        }
        Ok(self)
    }

    /// Check run parameters before any work starts
    pub fn validate(&self) -> Result<()> {
        self.run.validate()
    }

    /// Provider groups in reporting order (OpenAI first, then Anthropic)
    pub fn provider_models(&self) -> Vec<(Provider, Vec<String>)> {
        vec![
            (Provider::OpenAI, self.models.openai.clone()),
            (Provider::Anthropic, self.models.anthropic.clone()),
        ]
    }
}

/// Run parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Target character lengths, measured in order
    pub sizes: Vec<usize>,

    /// Generated texts per size
    pub trials: usize,

    /// RNG seed for text generation
    pub seed: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            sizes: DEFAULT_SIZES.to_vec(),
            trials: DEFAULT_TRIALS,
            seed: DEFAULT_SEED,
        }
    }
}

impl RunConfig {
    /// Reject empty or non-positive sizes and a zero trial count
    pub fn validate(&self) -> Result<()> {
        if self.sizes.is_empty() {
            return Err(BenchError::InvalidParameter(
                "at least one size is required".to_string(),
            ));
        }
        if let Some(pos) = self.sizes.iter().position(|&s| s == 0) {
            return Err(BenchError::InvalidParameter(format!(
                "size #{} must be a positive character count",
                pos + 1
            )));
        }
        if self.trials == 0 {
            return Err(BenchError::InvalidParameter(
                "trials must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Models to measure per provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// OpenAI model ids (counted locally)
    pub openai: Vec<String>,

    /// Anthropic model ids (counted live or approximated)
    pub anthropic: Vec<String>,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            openai: ["gpt-4o", "gpt-4o-mini", "gpt-4-turbo", "gpt-5"]
                .map(String::from)
                .to_vec(),
            anthropic: [
                "claude-3-5-sonnet-20240620",
                "claude-3-5-haiku-20241022",
                "claude-sonnet-4-20250514",
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}

/// Anthropic Count Tokens API configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnthropicConfig {
    /// API key; `None` disables live counting
    pub api_key: Option<String>,

    /// API base URL
    pub base_url: String,

    /// `anthropic-version` header value
    pub api_version: String,

    /// Per-request timeout in seconds (no timeout when unset)
    pub timeout_secs: Option<u64>,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.anthropic.com".to_string(),
            api_version: "2023-06-01".to_string(),
            timeout_secs: None,
        }
    }
}

impl std::fmt::Debug for AnthropicConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Export destinations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// CSV export path
    pub csv: Option<PathBuf>,

    /// JSON report path
    pub json: Option<PathBuf>,
}

/// Pick the first non-empty API key from sources in precedence order
///
/// # Example
/// ```
/// use token_bench::config::resolve_api_key;
///
/// assert_eq!(resolve_api_key(&[Some("cli"), Some("env")]), Some("cli".to_string()));
/// assert_eq!(resolve_api_key(&[Some(""), Some("env")]), Some("env".to_string()));
/// assert_eq!(resolve_api_key(&[None, None]), None);
/// ```
pub fn resolve_api_key(sources: &[Option<&str>]) -> Option<String> {
    sources
        .iter()
        .flatten()
        .find(|k| !k.is_empty())
        .map(|k| k.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = BenchConfig::default();
        assert_eq!(config.run.sizes, vec![256, 512, 1024, 2048, 4096, 8192]);
        assert_eq!(config.run.trials, 5);
        assert_eq!(config.run.seed, 17);
        assert_eq!(config.models.openai.len(), 4);
        assert_eq!(config.models.anthropic.len(), 3);
        assert!(config.anthropic.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_toml() {
        let toml = r#"
            [run]
            sizes = [100, 200]
            trials = 3

            [models]
            openai = ["gpt-4o"]
            anthropic = []

            [anthropic]
            base_url = "http://localhost:9000"
            timeout_secs = 10

            [output]
            csv = "out.csv"
        "#;

        let config: BenchConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.run.sizes, vec![100, 200]);
        assert_eq!(config.run.trials, 3);
        assert_eq!(config.run.seed, DEFAULT_SEED);
        assert_eq!(config.models.openai, vec!["gpt-4o".to_string()]);
        assert!(config.models.anthropic.is_empty());
        assert_eq!(config.anthropic.base_url, "http://localhost:9000");
        assert_eq!(config.anthropic.api_version, "2023-06-01");
        assert_eq!(config.anthropic.timeout_secs, Some(10));
        assert_eq!(config.output.csv, Some(PathBuf::from("out.csv")));
        assert!(config.output.json.is_none());
    }

    #[test]
    fn test_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bench.toml");
        std::fs::write(&path, "[run]\nseed = 99\n").unwrap();

        let config = BenchConfig::from_file(&path).unwrap();
        assert_eq!(config.run.seed, 99);

        let missing = BenchConfig::from_file(dir.path().join("missing.toml"));
        assert!(matches!(missing, Err(BenchError::Config(_))));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("TOKEN_BENCH_SIZES", "64, 128,"),
            ("TOKEN_BENCH_TRIALS", "2"),
            ("TOKEN_BENCH_SEED", "5"),
            ("ANTHROPIC_BASE_URL", "http://proxy.local"),
        ]
        .into_iter()
        .collect();

        let config = BenchConfig::default()
            .with_overrides_from(|name| vars.get(name).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.run.sizes, vec![64, 128]);
        assert_eq!(config.run.trials, 2);
        assert_eq!(config.run.seed, 5);
        assert_eq!(config.anthropic.base_url, "http://proxy.local");
    }

    #[test]
    fn test_env_override_rejects_garbage() {
        let result = BenchConfig::default().with_overrides_from(|name| {
            (name == "TOKEN_BENCH_TRIALS").then(|| "many".to_string())
        });
        assert!(matches!(result, Err(BenchError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_bad_run() {
        let run = RunConfig {
            trials: 0,
            ..Default::default()
        };
        assert!(run.validate().unwrap_err().is_precondition());

        let run = RunConfig {
            sizes: vec![256, 0],
            ..Default::default()
        };
        assert!(run.validate().unwrap_err().is_precondition());

        let run = RunConfig {
            sizes: vec![],
            ..Default::default()
        };
        assert!(run.validate().is_err());
    }

    #[test]
    fn test_resolve_api_key_precedence() {
        assert_eq!(
            resolve_api_key(&[Some("explicit"), Some("env")]).as_deref(),
            Some("explicit")
        );
        assert_eq!(resolve_api_key(&[None, Some("env")]).as_deref(), Some("env"));
        assert_eq!(resolve_api_key(&[None, Some("")]), None);
        assert_eq!(resolve_api_key(&[Some(""), None]), None);
    }

    fn with_file_key(key: Option<&str>) -> BenchConfig {
        BenchConfig {
            anthropic: AnthropicConfig {
                api_key: key.map(str::to_string),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_api_key_layering() {
        let key = |config: BenchConfig| config.anthropic.api_key;

        assert_eq!(
            key(with_file_key(Some("file")).with_api_key(Some("flag"), Some("env"))).as_deref(),
            Some("flag")
        );
        assert_eq!(
            key(with_file_key(Some("file")).with_api_key(None, Some("env"))).as_deref(),
            Some("file")
        );
        assert_eq!(
            key(with_file_key(None).with_api_key(None, Some("env"))).as_deref(),
            Some("env")
        );
        assert_eq!(key(with_file_key(Some("")).with_api_key(Some(""), Some(""))), None);
    }

    #[test]
    fn test_empty_flag_keeps_file_key() {
        let config = with_file_key(Some("sk-ant-file")).with_api_key(Some(""), None);
        assert_eq!(config.anthropic.api_key.as_deref(), Some("sk-ant-file"));

        let config = with_file_key(Some("")).with_api_key(Some(""), Some("sk-ant-env"));
        assert_eq!(config.anthropic.api_key.as_deref(), Some("sk-ant-env"));
    }

    #[test]
    fn test_config_parse_error_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[run]\ntrials = \"five\"\n").unwrap();

        assert!(matches!(BenchConfig::from_file(&path), Err(BenchError::Config(_))));
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = AnthropicConfig {
            api_key: Some("sk-ant-secret".into()),
            ..Default::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-ant-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_provider_models_order() {
        let groups = BenchConfig::default().provider_models();
        assert_eq!(groups[0].0, Provider::OpenAI);
        assert_eq!(groups[1].0, Provider::Anthropic);
    }
}
