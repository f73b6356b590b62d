//! Configuration constants and environment loading for the pipeline
//!
//! This module manages all runtime configuration:
//! - Price ladder width (odds columns per side)
//! - Default stake limits for markets that omit them
//! - Change-flag lifetime and sweep cadence

use crate::error::ConfigError;
use std::env;
use std::time::Duration;

/// Default number of price levels shown per side
pub const DEFAULT_ODDS_COLUMNS: usize = 1;

/// Upper bound for the price ladder width
pub const MAX_ODDS_COLUMNS: usize = 5;

/// Default minimum stake when a feed omits `min`
pub const DEFAULT_MIN_STAKE: f64 = 500.0;

/// Default maximum stake when a feed omits `max`
pub const DEFAULT_MAX_STAKE: f64 = 500_000.0;

/// How long a changed price cell stays flagged
pub const DEFAULT_BLINK_WINDOW_MS: u64 = 2000;

/// How often the live board sweeps expired flags
pub const DEFAULT_BLINK_SWEEP_MS: u64 = 250;

/// Configuration for normalization, formatting and change detection
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub odds_columns: usize,
    pub default_min_stake: f64,
    pub default_max_stake: f64,
    pub blink_window: Duration,
    pub blink_sweep_interval: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            odds_columns: DEFAULT_ODDS_COLUMNS,
            default_min_stake: DEFAULT_MIN_STAKE,
            default_max_stake: DEFAULT_MAX_STAKE,
            blink_window: Duration::from_millis(DEFAULT_BLINK_WINDOW_MS),
            blink_sweep_interval: Duration::from_millis(DEFAULT_BLINK_SWEEP_MS),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from environment variables with sensible defaults
    pub fn from_env() -> Self {
        let odds_columns = env::var("ODDS_COLUMNS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_ODDS_COLUMNS)
            .clamp(1, MAX_ODDS_COLUMNS);

        let default_min_stake = env::var("DEFAULT_MIN_STAKE")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite() && *v >= 0.0)
            .unwrap_or(DEFAULT_MIN_STAKE);

        let default_max_stake = env::var("DEFAULT_MAX_STAKE")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite() && *v >= 0.0)
            .unwrap_or(DEFAULT_MAX_STAKE);

        let blink_window = Duration::from_millis(
            env::var("BLINK_WINDOW_MS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(DEFAULT_BLINK_WINDOW_MS),
        );

        let blink_sweep_interval = Duration::from_millis(
            env::var("BLINK_SWEEP_MS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(DEFAULT_BLINK_SWEEP_MS)
                .max(10),
        );

        Self {
            odds_columns,
            default_min_stake,
            default_max_stake,
            blink_window,
            blink_sweep_interval,
        }
    }

    /// Builder-style override of the ladder width
    pub fn with_odds_columns(mut self, columns: usize) -> Self {
        self.odds_columns = columns;
        self
    }

    /// Builder-style override of the flag lifetime
    pub fn with_blink_window(mut self, window: Duration) -> Self {
        self.blink_window = window;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.odds_columns == 0 {
            return Err(ConfigError::ZeroColumns);
        }
        if self.default_min_stake > self.default_max_stake {
            return Err(ConfigError::StakeRange {
                min: self.default_min_stake,
                max: self.default_max_stake,
            });
        }
        if self.blink_window.is_zero() {
            return Err(ConfigError::ZeroBlinkWindow);
        }
        if self.blink_sweep_interval.is_zero() {
            return Err(ConfigError::ZeroSweepInterval);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = PipelineConfig::default();
        assert_eq!(config.odds_columns, 1);
        assert_eq!(config.default_min_stake, 500.0);
        assert_eq!(config.default_max_stake, 500_000.0);
        assert_eq!(config.blink_window, Duration::from_millis(2000));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_inverted_stakes() {
        let config = PipelineConfig {
            default_min_stake: 1000.0,
            default_max_stake: 10.0,
            ..PipelineConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::StakeRange { min: 1000.0, max: 10.0 })
        );
    }

    #[test]
    fn test_validate_rejects_zero_columns_and_window() {
        let config = PipelineConfig::default().with_odds_columns(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroColumns));

        let config = PipelineConfig::default().with_blink_window(Duration::ZERO);
        assert_eq!(config.validate(), Err(ConfigError::ZeroBlinkWindow));
    }
}
