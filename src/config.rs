//! Resolver configuration
//!
//! Loaded from YAML or built in code; every field has a default:
//!
//! ```yaml
//! strategy: fuzzy          # prefix | fuzzy
//! max_distance: 4          # 1..=4, fuzzy strategy only
//! punctuation: ",.;:"      # stripped for the secondary key variant
//! verify_check_digits: true
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::normalize::DEFAULT_PUNCTUATION;

/// Largest edit distance the fuzzy tier may report (level 4 + 4 = 8)
pub const MAX_FUZZY_DISTANCE: usize = 4;

/// Which lookup runs after the exact heading and alias tiers miss
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Longest stored prefix in the heading trie, then the alias trie
    #[default]
    Prefix,
    /// Nearest thesaurus terms by Levenshtein distance
    Fuzzy,
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrategyKind::Prefix => write!(f, "prefix"),
            StrategyKind::Fuzzy => write!(f, "fuzzy"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub strategy: StrategyKind,
    pub max_distance: usize,
    pub punctuation: String,
    pub verify_check_digits: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::Prefix,
            max_distance: MAX_FUZZY_DISTANCE,
            punctuation: DEFAULT_PUNCTUATION.to_string(),
            verify_check_digits: true,
        }
    }
}

impl ResolverConfig {
    /// Default configuration with the given strategy
    pub fn with_strategy(strategy: StrategyKind) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }

    /// Load from a YAML file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::load_from_str(&content)
    }

    /// Load from a YAML string
    pub fn load_from_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_FUZZY_DISTANCE).contains(&self.max_distance) {
            return Err(ConfigError::Invalid {
                field: "max_distance",
                reason: format!(
                    "must be between 1 and {MAX_FUZZY_DISTANCE}, got {}",
                    self.max_distance
                ),
            });
        }
        if self.punctuation.chars().any(char::is_alphanumeric) {
            return Err(ConfigError::Invalid {
                field: "punctuation",
                reason: "must not contain letters or digits".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ResolverConfig::default();
        assert_eq!(config.strategy, StrategyKind::Prefix);
        assert_eq!(config.max_distance, 4);
        assert!(config.verify_check_digits);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_yaml() {
        let config = ResolverConfig::load_from_str("strategy: fuzzy\nmax_distance: 2\n").unwrap();
        assert_eq!(config.strategy, StrategyKind::Fuzzy);
        assert_eq!(config.max_distance, 2);
        assert_eq!(config.punctuation, DEFAULT_PUNCTUATION);
    }

    #[test]
    fn test_load_rejects_distance_out_of_range() {
        let err = ResolverConfig::load_from_str("max_distance: 5").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "max_distance",
                ..
            }
        ));
        assert!(ResolverConfig::load_from_str("max_distance: 0").is_err());
    }

    #[test]
    fn test_load_rejects_alphanumeric_punctuation() {
        let err = ResolverConfig::load_from_str("punctuation: \",a\"").unwrap_err();
        assert!(err.to_string().contains("punctuation"));
    }

    #[test]
    fn test_load_rejects_unknown_strategy() {
        let err = ResolverConfig::load_from_str("strategy: phonetic").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = ResolverConfig::load_from_file(Path::new("/nonexistent/resolver.yaml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_strategy_display() {
        assert_eq!(StrategyKind::Prefix.to_string(), "prefix");
        assert_eq!(StrategyKind::Fuzzy.to_string(), "fuzzy");
    }
}
