//! Simulation configuration
//!
//! Fixed at construction; there is no runtime reconfiguration mid-session.
//! Loaded from JSON with per-field defaults, so a partial file is fine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Configuration validation failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be positive (got {value})")]
    NotPositive { field: &'static str, value: f64 },
    #[error("max_speed {max} is below base_speed {base}")]
    SpeedRange { base: f64, max: f64 },
    #[error("{field} {value} exceeds the limit of {limit}")]
    TooLarge { field: &'static str, value: u64, limit: u64 },
    #[error("a snake of length {start_length} does not fit on a {grid_size}x{grid_size} grid")]
    SnakeTooLong { start_length: usize, grid_size: i32 },
}

/// Construction-time simulation constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Cells per side of the board
    pub grid_size: i32,
    /// Initial snake length
    pub start_length: usize,
    /// Steps per second at session start
    pub base_speed: f64,
    /// Speed gained per food
    pub speed_step: f64,
    /// Speed cap
    pub max_speed: f64,
    /// Points per food
    pub food_score: u64,
    /// Largest per-frame delta (seconds) fed into the accumulator
    pub max_frame_delta: f64,
    /// Step cap per frame
    pub max_substeps: u32,
    /// Input channel capacity
    pub input_capacity: usize,
    /// RNG seed for food placement (wall clock when absent)
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            start_length: START_LENGTH,
            base_speed: BASE_SPEED,
            speed_step: SPEED_STEP,
            max_speed: MAX_SPEED,
            food_score: FOOD_SCORE,
            max_frame_delta: MAX_FRAME_DELTA,
            max_substeps: MAX_SUBSTEPS,
            input_capacity: INPUT_CAPACITY,
            seed: None,
        }
    }
}

impl SimConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()
    }

    /// Check every constant, returning the config unchanged when valid
    pub fn validate(self) -> Result<Self, ConfigError> {
        let checks = [
            ("grid_size", self.grid_size as f64),
            ("start_length", self.start_length as f64),
            ("base_speed", self.base_speed),
            ("speed_step", self.speed_step),
            ("max_speed", self.max_speed),
            ("food_score", self.food_score as f64),
            ("max_frame_delta", self.max_frame_delta),
            ("max_substeps", self.max_substeps as f64),
            ("input_capacity", self.input_capacity as f64),
        ];
        for (field, value) in checks {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        let limits = [
            ("grid_size", self.grid_size as u64, MAX_GRID_SIZE as u64),
            ("input_capacity", self.input_capacity as u64, MAX_INPUT_CAPACITY as u64),
        ];
        for (field, value, limit) in limits {
            if value > limit {
                return Err(ConfigError::TooLarge { field, value, limit });
            }
        }

        if self.max_speed < self.base_speed {
            return Err(ConfigError::SpeedRange {
                base: self.base_speed,
                max: self.max_speed,
            });
        }

        // The starting body extends left from the center cell and needs a
        // free cell left over for the first food
        let center = self.grid_size as i64 / 2;
        let cells = self.grid_size as i64 * self.grid_size as i64;
        let length = self.start_length as i64;
        if length > center + 1 || length >= cells {
            return Err(ConfigError::SnakeTooLong {
                start_length: self.start_length,
                grid_size: self.grid_size,
            });
        }

        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SimConfig::default().validate().unwrap();
        assert_eq!(config.grid_size, 24);
        assert_eq!(config.start_length, 3);
        assert_eq!(config.food_score, 10);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SimConfig::from_json(r#"{ "grid_size": 16, "seed": 7 }"#).unwrap();
        assert_eq!(config.grid_size, 16);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.base_speed, BASE_SPEED);
    }

    #[test]
    fn test_rejects_non_positive() {
        let err = SimConfig::from_json(r#"{ "speed_step": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::NotPositive { field: "speed_step", .. }));
    }

    #[test]
    fn test_rejects_inverted_speed_range() {
        let config = SimConfig {
            base_speed: 10.0,
            max_speed: 5.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::SpeedRange { .. })));
    }

    #[test]
    fn test_rejects_snake_longer_than_half_grid() {
        let config = SimConfig {
            grid_size: 4,
            start_length: 4,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::SnakeTooLong { .. })));

        let config = SimConfig {
            grid_size: 4,
            start_length: 3,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_oversized_grid() {
        let config = SimConfig {
            grid_size: 50_000,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TooLarge { field: "grid_size", .. })
        ));

        let config = SimConfig {
            input_capacity: usize::MAX,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TooLarge { field: "input_capacity", .. })
        ));
    }

    #[test]
    fn test_largest_grid_builds_a_session() {
        let config = SimConfig {
            grid_size: MAX_GRID_SIZE,
            ..Default::default()
        }
        .validate()
        .unwrap();
        let session = crate::sim::Session::with_seed(config, 0, 9);
        let state = session.state();
        assert!(crate::sim::in_bounds(state.food, MAX_GRID_SIZE));
        assert!(!state.occupies(state.food));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            SimConfig::from_json("{ grid_size"),
            Err(ConfigError::Parse(_))
        ));
    }
}
