//! Simulation configuration.
//!
//! Read from the JSON file named by `BLOCKRELIC_SIM_CONFIG` when set, with
//! `SIM_SEED` and `SIM_ROUNDS` overriding the file. Missing fields fall back
//! to defaults.

use blockrelic_core::{RelicType, ScoringRules};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

pub const CONFIG_ENV: &str = "BLOCKRELIC_SIM_CONFIG";
pub const SEED_ENV: &str = "SIM_SEED";
pub const ROUNDS_ENV: &str = "SIM_ROUNDS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid value for {var}: {value:?}")]
    InvalidOverride { var: &'static str, value: String },
}

/// How the simulated player picks a placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Any valid placement
    Random,
    /// Most lines first, then the snuggest fit
    Greedy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Fixed seed for pieces and lucky rolls; entropy when absent
    pub seed: Option<u64>,
    pub rounds: u32,
    pub hands_per_round: u32,
    pub discards_per_round: u32,
    pub deck_size: u32,
    pub strategy: Strategy,
    /// Relics owned from the start, in display order
    pub relics: Vec<RelicType>,
    /// Buy one relic between rounds when gold allows
    pub shop: bool,
    pub pattern_chance: f64,
    pub seal_chance: f64,
    pub blessing_chance: f64,
    pub rules: ScoringRules,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: None,
            rounds: 8,
            hands_per_round: 12,
            discards_per_round: 2,
            deck_size: 40,
            strategy: Strategy::Greedy,
            relics: Vec::new(),
            shop: true,
            pattern_chance: 0.3,
            seal_chance: 0.15,
            blessing_chance: 0.1,
            rules: ScoringRules::default(),
        }
    }
}

impl SimConfig {
    /// Load from the environment
    pub fn load() -> Result<Self, ConfigError> {
        let file = match std::env::var_os(CONFIG_ENV) {
            Some(path) => {
                let path = PathBuf::from(path);
                let contents = std::fs::read_to_string(&path)
                    .map_err(|source| ConfigError::Read { path, source })?;
                Some(contents)
            }
            None => None,
        };
        Self::from_sources(
            file.as_deref(),
            std::env::var(SEED_ENV).ok(),
            std::env::var(ROUNDS_ENV).ok(),
        )
    }

    /// Merge an optional JSON document with optional overrides
    pub fn from_sources(
        json: Option<&str>,
        seed: Option<String>,
        rounds: Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = match json {
            Some(json) => serde_json::from_str(json)?,
            None => Self::default(),
        };
        if let Some(value) = seed {
            config.seed = Some(parse_override(SEED_ENV, value)?);
        }
        if let Some(value) = rounds {
            config.rounds = parse_override(ROUNDS_ENV, value)?;
        }
        Ok(config)
    }
}

fn parse_override<T: std::str::FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidOverride { var, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_sources() {
        let config = SimConfig::from_sources(None, None, None).unwrap();
        assert_eq!(config, SimConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let json = r#"{"rounds": 3, "relics": ["streak", "copy"], "rules": {"arrow_bonus": 5}}"#;
        let config = SimConfig::from_sources(Some(json), None, None).unwrap();
        assert_eq!(config.rounds, 3);
        assert_eq!(config.relics, vec![RelicType::Streak, RelicType::Copy]);
        assert_eq!(config.rules.arrow_bonus, 5);
        assert_eq!(config.hands_per_round, 12);
    }

    #[test]
    fn test_env_overrides_win() {
        let config = SimConfig::from_sources(
            Some(r#"{"seed": 1, "rounds": 3}"#),
            Some("42".into()),
            Some(" 5 ".into()),
        )
        .unwrap();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.rounds, 5);
    }

    #[test]
    fn test_bad_override_is_an_error() {
        let err = SimConfig::from_sources(None, Some("abc".into()), None).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidOverride { var: SEED_ENV, .. }
        ));
    }
}
