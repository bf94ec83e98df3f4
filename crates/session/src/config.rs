//! Session controller configuration.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `SESSION_NAVIGATION_DELAY_MS` - Delay before the navigator call fires,
//!   letting the state update commit first (default: 50)
//! - `SESSION_NAVIGATION_COOLDOWN_MS` - Window after which the in-flight
//!   navigation guard is released regardless of outcome (default: 3000)

use std::time::Duration;

use thiserror::Error;

const NAVIGATION_DELAY_VAR: &str = "SESSION_NAVIGATION_DELAY_MS";
const NAVIGATION_COOLDOWN_VAR: &str = "SESSION_NAVIGATION_COOLDOWN_MS";

const DEFAULT_NAVIGATION_DELAY_MS: u64 = 50;
const DEFAULT_NAVIGATION_COOLDOWN_MS: u64 = 3_000;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable was present but unusable.
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),

    /// The cooldown would release the guard before the navigation fires.
    #[error("navigation cooldown must be at least the navigation delay")]
    CooldownTooShort,
}

/// Timing configuration for the session controller.
///
/// The cooldown is a liveness safeguard, not a correctness deadline: it
/// guarantees a stuck in-flight flag never blocks a legitimate later
/// transition.
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    /// Delay between a navigation decision and the navigator call.
    pub navigation_delay: Duration,
    /// Window after which the in-flight guard resets unconditionally.
    pub navigation_cooldown: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            navigation_delay: Duration::from_millis(DEFAULT_NAVIGATION_DELAY_MS),
            navigation_cooldown: Duration::from_millis(DEFAULT_NAVIGATION_COOLDOWN_MS),
        }
    }
}

impl SessionConfig {
    /// Load the configuration from environment variables, falling back to
    /// defaults for anything unset.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if a variable is present but not
    /// a millisecond count, and `ConfigError::CooldownTooShort` if the
    /// cooldown is shorter than the delay.
    pub fn from_env() -> Result<Self, ConfigError> {
        let delay_ms = parse_ms(
            NAVIGATION_DELAY_VAR,
            std::env::var(NAVIGATION_DELAY_VAR).ok().as_deref(),
            DEFAULT_NAVIGATION_DELAY_MS,
        )?;
        let cooldown_ms = parse_ms(
            NAVIGATION_COOLDOWN_VAR,
            std::env::var(NAVIGATION_COOLDOWN_VAR).ok().as_deref(),
            DEFAULT_NAVIGATION_COOLDOWN_MS,
        )?;
        Self::from_millis(delay_ms, cooldown_ms)
    }

    /// Build a configuration from raw millisecond values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::CooldownTooShort` if the cooldown is shorter
    /// than the delay, which would release the in-flight guard before the
    /// navigation fires.
    pub const fn from_millis(delay_ms: u64, cooldown_ms: u64) -> Result<Self, ConfigError> {
        if cooldown_ms < delay_ms {
            return Err(ConfigError::CooldownTooShort);
        }
        Ok(Self {
            navigation_delay: Duration::from_millis(delay_ms),
            navigation_cooldown: Duration::from_millis(cooldown_ms),
        })
    }
}

/// Parse an optional millisecond value, keeping the variable name for the
/// error message.
fn parse_ms(name: &str, raw: Option<&str>, default: u64) -> Result<u64, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| {
            ConfigError::InvalidEnvVar(
                name.to_owned(),
                format!("expected a millisecond count, got {value:?}"),
            )
        }),
    }
}
