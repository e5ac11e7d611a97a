//! Engine configuration parameters
//!
//! Timing and default values for the protocol engine. The defaults match
//! the controller firmware; a host may override them from a JSON file.

use embassy_time::Duration;
use serde::{Deserialize, Serialize};

/// Hard ceiling on the ACK wait. Callers rely on a command failing within
/// this bound, so configuration may shorten it but never extend it.
pub const MAX_ACK_TIMEOUT_MS: u64 = 5000;

/// Core engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // --- Acknowledgement ---
    /// How long a command waits for its ACK before failing (milliseconds)
    pub ack_timeout_ms: u64,
    /// Polling slice while waiting for an ACK (milliseconds)
    pub ack_poll_interval_ms: u64,

    // --- Sequencing ---
    /// Pause after power-on before a colour/preset command (milliseconds)
    pub settle_delay_ms: u64,

    // --- Defaults ---
    /// Brightness (1-100%) used when none is known
    pub default_brightness: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ack_timeout_ms: MAX_ACK_TIMEOUT_MS,
            ack_poll_interval_ms: 100,
            settle_delay_ms: 100,
            default_brightness: 50,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON document. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|_| ConfigError::Malformed)?;
        config.validate()?;
        Ok(config)
    }

    /// Range-check every field. Invalid values are rejected, not clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ack_timeout_ms == 0 || self.ack_timeout_ms > MAX_ACK_TIMEOUT_MS {
            return Err(ConfigError::ValidationFailed(
                "ack_timeout_ms must be within 1..=5000",
            ));
        }
        if self.ack_poll_interval_ms == 0 || self.ack_poll_interval_ms > self.ack_timeout_ms {
            return Err(ConfigError::ValidationFailed(
                "ack_poll_interval_ms must be within 1..=ack_timeout_ms",
            ));
        }
        if self.default_brightness == 0 || self.default_brightness > 100 {
            return Err(ConfigError::ValidationFailed(
                "default_brightness must be within 1..=100",
            ));
        }
        Ok(())
    }

    pub fn ack_timeout(&self) -> Duration {
        Duration::from_millis(self.ack_timeout_ms)
    }

    pub fn ack_poll_interval(&self) -> Duration {
        Duration::from_millis(self.ack_poll_interval_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

/// Errors from loading or validating an [`EngineConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The document could not be deserialized.
    Malformed,
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Malformed => write!(f, "config malformed"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}
