use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Cards drawn for every opening hand, mulligan or not
pub const CARDS_IN_HAND: u32 = 7;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Which turns get a post-mulligan draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DrawConvention {
    /// Draw on turns 2..=target (the player on the play skips the turn-1 draw)
    #[default]
    OnThePlay,
    /// Draw on turns 0..target, one card per turn of the target
    OnTheDraw,
}

impl DrawConvention {
    /// Number of cards drawn after the opening hand to reach `target_turn`
    pub fn draws_until(self, target_turn: u32) -> u32 {
        match self {
            DrawConvention::OnThePlay => target_turn.saturating_sub(1),
            DrawConvention::OnTheDraw => target_turn,
        }
    }
}

/// What a success count is divided by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Denominator {
    /// Trials that reached the target turn with enough lands
    #[default]
    Conditional,
    /// Every trial run
    AllTrials,
}

/// Execution backend for the sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Worker threads pulling indices from a shared blocking queue
    Queue,
    /// One contiguous slice of requirements per thread
    Partitioned,
    /// Data-parallel map on a dedicated rayon pool
    #[default]
    DataParallel,
}

/// Full configuration of a sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub deck_size: u32,
    /// Defaults to the 17-in-40 land ratio scaled to `deck_size`
    pub land_count: Option<u32>,
    pub max_turn: u32,
    pub max_color_a: u32,
    pub max_color_b: u32,
    pub trials: u32,
    /// Smallest hand a mulligan sequence can end on
    pub mulligan_floor: u32,
    pub draw_convention: DrawConvention,
    pub denominator: Denominator,
    pub strategy: Strategy,
    /// 0 means one worker per available core
    pub threads: usize,
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            deck_size: 40,
            land_count: None,
            max_turn: 8,
            max_color_a: 6,
            max_color_b: 3,
            trials: 650_000,
            mulligan_floor: 2,
            draw_convention: DrawConvention::OnThePlay,
            denominator: Denominator::Conditional,
            strategy: Strategy::DataParallel,
            threads: 0,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: EngineConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn land_count(&self) -> u32 {
        self.land_count.unwrap_or(17 * self.deck_size / 40)
    }

    /// Worker count after resolving `threads == 0`
    pub fn worker_count(&self) -> usize {
        if self.threads > 0 {
            return self.threads;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }

    /// Check the domain bounds before any work is dispatched
    pub fn validate(&self) -> Result<(), ConfigError> {
        let lands = self.land_count();
        if self.deck_size < CARDS_IN_HAND {
            return Err(ConfigError::Invalid(format!(
                "deck of {} cards cannot deal a {}-card hand",
                self.deck_size, CARDS_IN_HAND
            )));
        }
        if lands > self.deck_size {
            return Err(ConfigError::Invalid(format!(
                "land count {} exceeds deck size {}",
                lands, self.deck_size
            )));
        }
        if self.max_turn == 0 {
            return Err(ConfigError::Invalid("max_turn must be at least 1".to_string()));
        }
        if self.max_color_a == 0 {
            return Err(ConfigError::Invalid("max_color_a must be at least 1".to_string()));
        }
        if self.max_color_b > self.max_color_a {
            return Err(ConfigError::Invalid(format!(
                "max_color_b {} exceeds max_color_a {}",
                self.max_color_b, self.max_color_a
            )));
        }
        if self.trials == 0 {
            return Err(ConfigError::Invalid("trials must be positive".to_string()));
        }
        if !(1..=CARDS_IN_HAND).contains(&self.mulligan_floor) {
            return Err(ConfigError::Invalid(format!(
                "mulligan_floor must be in 1..={}, got {}",
                CARDS_IN_HAND, self.mulligan_floor
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.land_count(), 17);
    }

    #[test]
    fn test_land_count_scales_with_deck_size() {
        let mut config = EngineConfig::default();
        config.deck_size = 60;
        assert_eq!(config.land_count(), 25);
        config.deck_size = 99;
        assert_eq!(config.land_count(), 42);
        config.land_count = Some(24);
        assert_eq!(config.land_count(), 24);
    }

    #[test]
    fn test_rejects_bad_bounds() {
        let mut config = EngineConfig::default();
        config.land_count = Some(41);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = EngineConfig::default();
        config.max_color_b = 7;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.trials = 0;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.mulligan_floor = 8;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.deck_size = 5;
        config.land_count = Some(2);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"deck_size": 60, "draw_convention": "on_the_draw"}"#)
                .expect("config should parse");
        assert_eq!(config.deck_size, 60);
        assert_eq!(config.draw_convention, DrawConvention::OnTheDraw);
        assert_eq!(config.max_turn, 8);
        assert_eq!(config.strategy, Strategy::DataParallel);
    }

    #[test]
    fn test_draws_until() {
        assert_eq!(DrawConvention::OnThePlay.draws_until(1), 0);
        assert_eq!(DrawConvention::OnThePlay.draws_until(4), 3);
        assert_eq!(DrawConvention::OnTheDraw.draws_until(4), 4);
    }
}
