use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::engine::piece_generator::PieceSeed;

/// Error returned by [`GameConfig::validate`].
#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("soft drop factor {factor} is outside (0, 1]")]
    SoftDropFactorOutOfRange { factor: f64 },
    #[display("soft drop minimum interval must be greater than zero")]
    ZeroSoftDropInterval,
}

/// Timing and randomness settings for a [`GameController`](crate::GameController).
///
/// Missing fields take their defaults when deserializing. Durations are written as
/// integer milliseconds.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use blockfall_engine::GameConfig;
///
/// let config: GameConfig = serde_json::from_str(r#"{ "clear_delay": 500 }"#).unwrap();
///
/// assert_eq!(config.clear_delay, Duration::from_millis(500));
/// assert_eq!(config.soft_drop_factor, 0.08);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// How long completed rows flash before they are removed.
    #[serde(with = "millis")]
    pub clear_delay: Duration,
    /// Fall interval multiplier while soft drop is held.
    pub soft_drop_factor: f64,
    /// Lower bound of the soft-drop fall interval.
    #[serde(with = "millis")]
    pub soft_drop_min_interval: Duration,
    /// Seed for the piece stream; a random seed is used when absent.
    pub seed: Option<PieceSeed>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            clear_delay: Duration::from_millis(260),
            soft_drop_factor: 0.08,
            soft_drop_min_interval: Duration::from_millis(20),
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let factor = self.soft_drop_factor;
        if factor.is_nan() || factor <= 0.0 || factor > 1.0 {
            return Err(ConfigError::SoftDropFactorOutOfRange { factor });
        }
        if self.soft_drop_min_interval.is_zero() {
            return Err(ConfigError::ZeroSoftDropInterval);
        }
        Ok(())
    }

    /// Fall interval while soft drop is held, given the normal `fall_speed`.
    #[must_use]
    pub fn soft_drop_interval(&self, fall_speed: Duration) -> Duration {
        fall_speed
            .mul_f64(self.soft_drop_factor)
            .max(self.soft_drop_min_interval)
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis = u64::try_from(value.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
