//! Annealing configuration.

use serde::{Deserialize, Serialize};

use crate::models::ConfigurationError;

/// Default starting temperature.
pub const DEFAULT_INITIAL_TEMPERATURE: f64 = 1000.0;

/// Default geometric cooling factor.
pub const DEFAULT_COOLING_RATE: f64 = 0.99;

/// The search stops once the temperature is at or below this value.
///
/// Absolute, independent of the starting temperature.
pub const TEMPERATURE_FLOOR: f64 = 1.0;

/// Configuration for the annealing search.
///
/// Cooling is geometric: `T_{k+1} = cooling_rate · T_k`, until
/// `T <= TEMPERATURE_FLOOR`.
///
/// # Examples
///
/// ```
/// use u_vrptw::annealing::AnnealingConfig;
///
/// let config = AnnealingConfig::default()
///     .with_initial_temperature(500.0)
///     .with_cooling_rate(0.95)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.seed, Some(42));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnealingConfig {
    /// Starting temperature. Higher values accept more uphill moves early on.
    pub initial_temperature: f64,

    /// Geometric cooling factor in `(0, 1)`. Higher = slower cooling.
    pub cooling_rate: f64,

    /// Random seed for reproducibility. `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        Self {
            initial_temperature: DEFAULT_INITIAL_TEMPERATURE,
            cooling_rate: DEFAULT_COOLING_RATE,
            seed: None,
        }
    }
}

impl AnnealingConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling_rate = rate;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !self.initial_temperature.is_finite() || self.initial_temperature <= 0.0 {
            return Err(ConfigurationError::InvalidParameter {
                name: "initial_temperature",
                reason: format!("must be finite and positive, got {}", self.initial_temperature),
            });
        }
        if !(self.cooling_rate > 0.0 && self.cooling_rate < 1.0) {
            return Err(ConfigurationError::InvalidParameter {
                name: "cooling_rate",
                reason: format!("must be in (0, 1), got {}", self.cooling_rate),
            });
        }
        Ok(())
    }

    /// Number of iterations a run with this configuration performs.
    ///
    /// Replays the cooling schedule, so the count matches the engine exactly.
    /// Assumes a valid configuration.
    pub fn expected_iterations(&self) -> usize {
        let mut t = self.initial_temperature;
        let mut n = 0;
        while t > TEMPERATURE_FLOOR {
            t *= self.cooling_rate;
            n += 1;
        }
        n
    }
}
