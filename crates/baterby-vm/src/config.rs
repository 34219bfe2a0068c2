//! Policy configuration
//!
//! A [`PolicyConfig`] is fixed for the lifetime of one interpreter. It can
//! be built in code, or loaded from a TOML file where every field is
//! optional:
//!
//! ```toml
//! random_seed = 7
//! random_prefer_not_probability = 0.0
//! max_actions_without_pause = 5
//! sensitive_keywords = ["exploit", "phish"]
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Keywords refused out of the box
pub const DEFAULT_SENSITIVE_KEYWORDS: [&str; 11] = [
    "bypass",
    "hack",
    "exploit",
    "fraude",
    "dox",
    "malware",
    "armas",
    "bomba",
    "dos",
    "phish",
    "autolesión",
];

/// Configuration of the refusal rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Seed for the random pause rule
    pub random_seed: u64,
    /// Chance in [0, 1] of an unconditional random pause
    pub random_prefer_not_probability: f64,
    /// Successful actions tolerated before a `PAUSE` is demanded
    pub max_actions_without_pause: u32,
    /// Case-insensitive substrings that trigger a refusal
    pub sensitive_keywords: Vec<String>,
}

impl PolicyConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With random seed
    #[inline]
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }

    /// With random pause probability
    #[inline]
    #[must_use]
    pub fn with_prefer_not_probability(mut self, probability: f64) -> Self {
        self.random_prefer_not_probability = probability;
        self
    }

    /// With fatigue threshold
    #[inline]
    #[must_use]
    pub fn with_max_actions_without_pause(mut self, max: u32) -> Self {
        self.max_actions_without_pause = max;
        self
    }

    /// Replace the sensitive keyword set
    #[must_use]
    pub fn with_sensitive_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sensitive_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Add one sensitive keyword
    #[must_use]
    pub fn with_sensitive_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.sensitive_keywords.push(keyword.into());
        self
    }

    /// Check the configuration invariants.
    ///
    /// # Errors
    /// - Probability is NaN or outside [0, 1]
    /// - A keyword is empty (it would match every line)
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = self.random_prefer_not_probability;
        if !(0.0..=1.0).contains(&p) {
            return Err(ConfigError::ProbabilityOutOfRange(p));
        }
        if let Some(index) = self.sensitive_keywords.iter().position(|k| k.trim().is_empty()) {
            return Err(ConfigError::EmptyKeyword(index));
        }
        Ok(())
    }

    /// Parse and validate TOML text. Missing fields keep their defaults.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] on malformed TOML, or a validation
    /// error from [`PolicyConfig::validate`].
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Self::parse_toml(text, Path::new("<inline>"))
    }

    /// Read, parse and validate a TOML config file.
    ///
    /// # Errors
    /// IO failures, malformed TOML, or invalid values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::io_error(path, e))?;
        Self::parse_toml(&text, path)
    }

    fn parse_toml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|e| ConfigError::parse_error(path, e))?;
        config.validate()?;
        tracing::debug!(path = %path.display(), seed = config.random_seed, "Loaded policy config");
        Ok(config)
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            random_seed: 42,
            random_prefer_not_probability: 0.07,
            max_actions_without_pause: 3,
            sensitive_keywords: DEFAULT_SENSITIVE_KEYWORDS.iter().map(|k| (*k).to_string()).collect(),
        }
    }
}
