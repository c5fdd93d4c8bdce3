//! Configuration management for the admission engine.
//!
//! Loads configuration from environment variables with sensible defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Engine configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Payment gateway configuration
    pub gateway: GatewayConfig,
}

/// Payment gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Timeout for a single gateway round-trip, in seconds.
    ///
    /// A charge that exceeds this surfaces as a payment error instead of
    /// hanging the caller.
    pub timeout_secs: u64,
}

impl GatewayConfig {
    /// The gateway timeout as a [`Duration`]
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Loads configuration from environment variables, falling back to
    /// defaults for anything unset or unparsable.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `ADMISSIONS_GATEWAY_TIMEOUT_SECS` | `10` |
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            gateway: GatewayConfig {
                timeout_secs: env_or("ADMISSIONS_GATEWAY_TIMEOUT_SECS", 10),
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn env_or(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::from_env();
        assert_eq!(config.gateway.timeout_secs, 10);
        assert_eq!(config.gateway.timeout(), Duration::from_secs(10));
    }
}
