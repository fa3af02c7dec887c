use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, TabularPpoError};
use crate::types::GridAction;

/// Training hyperparameters and run settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Side length of the grid; the state table has `grid_size^2` rows
    pub grid_size: usize,
    /// Number of discrete actions (up, down, left, right)
    pub action_size: usize,
    /// KL penalty coefficient
    pub beta: f32,
    /// Clip band half-width for the probability ratio
    pub epsilon: f32,
    /// Discount factor
    pub gamma: f32,
    pub learning_rate: f32,
    pub episodes: usize,
    /// Seed for policy initialisation and action sampling; entropy from the OS when unset
    pub seed: Option<u64>,
    /// Log every n-th episode at info level (0 disables per-episode lines)
    pub log_interval: usize,
    pub model_dir: PathBuf,
    pub model_name: String,
    pub save_model: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        TrainingConfig {
            grid_size: 8,
            action_size: GridAction::COUNT,
            beta: 0.1,
            epsilon: 0.2,
            gamma: 0.99,
            learning_rate: 0.01,
            episodes: 1000,
            seed: None,
            log_interval: 1,
            model_dir: PathBuf::from("models"),
            model_name: "rl_policy".to_string(),
            save_model: true,
        }
    }
}

impl TrainingConfig {
    pub fn state_size(&self) -> usize {
        self.grid_size * self.grid_size
    }

    /// Check parameter ranges
    pub fn validate(&self) -> Result<()> {
        if self.grid_size == 0 {
            return Err(TabularPpoError::invalid_parameter("grid_size", "must be at least 1"));
        }
        if self.action_size != GridAction::COUNT {
            return Err(TabularPpoError::invalid_parameter(
                "action_size".to_string(),
                format!("grid world has {} actions, got {}", GridAction::COUNT, self.action_size),
            ));
        }
        if !(self.epsilon > 0.0 && self.epsilon < 1.0) {
            return Err(TabularPpoError::invalid_parameter(
                "epsilon".to_string(),
                format!("must lie in (0, 1), got {}", self.epsilon),
            ));
        }
        if !(self.gamma > 0.0 && self.gamma <= 1.0) {
            return Err(TabularPpoError::invalid_parameter(
                "gamma".to_string(),
                format!("must lie in (0, 1], got {}", self.gamma),
            ));
        }
        if !self.beta.is_finite() || self.beta < 0.0 {
            return Err(TabularPpoError::invalid_parameter(
                "beta".to_string(),
                format!("must be finite and non-negative, got {}", self.beta),
            ));
        }
        if !self.learning_rate.is_finite() {
            return Err(TabularPpoError::invalid_parameter(
                "learning_rate".to_string(),
                format!("must be finite, got {}", self.learning_rate),
            ));
        }
        if self.model_name.is_empty() {
            return Err(TabularPpoError::invalid_parameter("model_name", "must not be empty"));
        }
        Ok(())
    }

    /// Load a JSON config; missing fields take their defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let config: TrainingConfig = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let serialized = serde_json::to_string_pretty(self)?;
        std::fs::write(path, serialized)?;
        Ok(())
    }
}

/// Builder for TrainingConfig
pub struct TrainingConfigBuilder {
    config: TrainingConfig,
}

impl TrainingConfigBuilder {
    pub fn new() -> Self {
        TrainingConfigBuilder { config: TrainingConfig::default() }
    }

    pub fn grid_size(mut self, grid_size: usize) -> Self {
        self.config.grid_size = grid_size;
        self
    }

    pub fn beta(mut self, beta: f32) -> Self {
        self.config.beta = beta;
        self
    }

    pub fn epsilon(mut self, epsilon: f32) -> Self {
        self.config.epsilon = epsilon;
        self
    }

    pub fn gamma(mut self, gamma: f32) -> Self {
        self.config.gamma = gamma;
        self
    }

    pub fn learning_rate(mut self, lr: f32) -> Self {
        self.config.learning_rate = lr;
        self
    }

    pub fn episodes(mut self, episodes: usize) -> Self {
        self.config.episodes = episodes;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn log_interval(mut self, interval: usize) -> Self {
        self.config.log_interval = interval;
        self
    }

    pub fn model_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.config.model_dir = dir.into();
        self
    }

    pub fn model_name<S: Into<String>>(mut self, name: S) -> Self {
        self.config.model_name = name.into();
        self
    }

    pub fn save_model(mut self, save: bool) -> Self {
        self.config.save_model = save;
        self
    }

    pub fn build(self) -> Result<TrainingConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for TrainingConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TrainingConfig::default();
        assert_eq!(config.grid_size, 8);
        assert_eq!(config.state_size(), 64);
        assert_eq!(config.action_size, 4);
        assert_eq!(config.beta, 0.1);
        assert_eq!(config.epsilon, 0.2);
        assert_eq!(config.gamma, 0.99);
        assert_eq!(config.learning_rate, 0.01);
        assert_eq!(config.episodes, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = TrainingConfigBuilder::new()
            .grid_size(5)
            .beta(0.0)
            .gamma(1.0)
            .episodes(10)
            .seed(3)
            .build()
            .unwrap();

        assert_eq!(config.state_size(), 25);
        assert_eq!(config.beta, 0.0);
        assert_eq!(config.seed, Some(3));
    }

    #[test]
    fn test_validation_ranges() {
        assert!(TrainingConfigBuilder::new().epsilon(0.0).build().is_err());
        assert!(TrainingConfigBuilder::new().epsilon(1.0).build().is_err());
        assert!(TrainingConfigBuilder::new().gamma(0.0).build().is_err());
        assert!(TrainingConfigBuilder::new().gamma(1.01).build().is_err());
        assert!(TrainingConfigBuilder::new().beta(-1.0).build().is_err());
        assert!(TrainingConfigBuilder::new().grid_size(0).build().is_err());
        assert!(TrainingConfigBuilder::new().learning_rate(f32::NAN).build().is_err());
        assert!(TrainingConfigBuilder::new().model_name("").build().is_err());

        let mut config = TrainingConfig::default();
        config.action_size = 5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_roundtrip_with_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "grid_size": 4, "episodes": 7, "seed": 12 }"#).unwrap();

        let config = TrainingConfig::from_json_file(&path).unwrap();
        assert_eq!(config.grid_size, 4);
        assert_eq!(config.episodes, 7);
        assert_eq!(config.seed, Some(12));
        assert_eq!(config.gamma, 0.99);

        let out = dir.path().join("out.json");
        config.to_json_file(&out).unwrap();
        assert_eq!(TrainingConfig::from_json_file(&out).unwrap(), config);
    }

    #[test]
    fn test_invalid_json_values_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "epsilon": 1.5 }"#).unwrap();
        assert!(matches!(
            TrainingConfig::from_json_file(&path),
            Err(TabularPpoError::InvalidParameter { .. })
        ));
    }
}
