use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Millis;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("debounce delay must be positive")]
    ZeroDebounceDelay,
    #[error("integrator threshold must be positive")]
    ZeroIntegratorThreshold,
    #[error("bounce pattern must not be empty")]
    EmptyBouncePattern,
    #[error("bounce step interval must be positive")]
    ZeroBounceStepInterval,
    #[error("bounce session duration must be positive")]
    ZeroBounceSessionDuration,
    #[error("tick interval must be positive")]
    ZeroTickInterval,
    #[error("invalid engine config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Engine tuning. All durations are in milliseconds; levels are raw input
/// levels, interpreted through `pressed_level`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub debounce_delay_ms: Millis,
    pub integrator_threshold: u32,
    pub long_press_threshold_ms: Millis,
    pub release_poll_interval_ms: Millis,
    pub bounce_pattern: Vec<bool>,
    pub bounce_step_interval_ms: Millis,
    pub bounce_session_duration_ms: Millis,
    pub report_interval_ms: Millis,
    /// Raw level of a pressed button. `false` for pull-up wiring.
    pub pressed_level: bool,
    /// Polling cadence the integrator threshold is tuned for.
    pub tick_interval_ms: Millis,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            debounce_delay_ms: 50,
            integrator_threshold: 5,
            long_press_threshold_ms: 1000,
            release_poll_interval_ms: 10,
            // HIGH, LOW, HIGH, ... on a pull-up line
            bounce_pattern: vec![true, false, true, false, true, false, true],
            bounce_step_interval_ms: 5,
            bounce_session_duration_ms: 50,
            report_interval_ms: 3000,
            pressed_level: false,
            tick_interval_ms: 1,
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.debounce_delay_ms == 0 {
            return Err(ConfigError::ZeroDebounceDelay);
        }
        if self.integrator_threshold == 0 {
            return Err(ConfigError::ZeroIntegratorThreshold);
        }
        if self.bounce_pattern.is_empty() {
            return Err(ConfigError::EmptyBouncePattern);
        }
        if self.bounce_step_interval_ms == 0 {
            return Err(ConfigError::ZeroBounceStepInterval);
        }
        if self.bounce_session_duration_ms == 0 {
            return Err(ConfigError::ZeroBounceSessionDuration);
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        Ok(())
    }
}
