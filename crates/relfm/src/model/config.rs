//! Factorization machine configuration with builder pattern.
//!
//! [`FMConfig`] collects the settings needed to construct and initialize a
//! [`FactorizationMachine`](crate::FactorizationMachine). It uses the `bon`
//! crate for builder generation with validation at build time.
//!
//! # Example
//!
//! ```
//! use relfm::{FactorizationMachine, FMConfig};
//!
//! // All defaults
//! let config = FMConfig::builder().build().unwrap();
//! assert_eq!(config.n_factors, 10);
//!
//! // Customized
//! let config = FMConfig::builder()
//!     .n_factors(8)
//!     .init_std(0.05)
//!     .seed(7)
//!     .build()
//!     .unwrap();
//! let fm = FactorizationMachine::from_config(100, &config).unwrap();
//! assert_eq!(fm.n_factors(), 8);
//! ```

use bon::Builder;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

// =============================================================================
// ConfigError
// =============================================================================

/// Errors that can occur during configuration validation.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Initialization standard deviation must be finite and non-negative.
    InvalidInitStd(f64),
    /// At least one hyperparameter group is required.
    InvalidNGroups,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInitStd(v) => {
                write!(f, "init_std must be finite and non-negative, got {}", v)
            }
            Self::InvalidNGroups => write!(f, "n_groups must be at least 1"),
        }
    }
}

impl std::error::Error for ConfigError {}

// =============================================================================
// FMConfig
// =============================================================================

/// Construction and initialization settings for a factorization machine.
#[derive(Debug, Clone, Builder)]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
pub struct FMConfig {
    /// Number of latent factors. Default: 10.
    ///
    /// Zero is allowed and reduces the model to a linear one.
    #[builder(default = 10)]
    pub n_factors: usize,

    /// Standard deviation of the normal distribution weights are drawn from.
    /// Default: 0.1.
    #[builder(default = 0.1)]
    pub init_std: f64,

    /// Number of hyperparameter groups the features are partitioned into.
    /// Default: 1.
    #[builder(default = 1)]
    pub n_groups: usize,

    /// Random seed for weight initialization. Default: 42.
    #[builder(default = 42)]
    pub seed: u64,
}

/// Custom finishing function that validates the config.
impl<S: f_m_config_builder::IsComplete> FMConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if:
    /// - `init_std` is negative or not finite
    /// - `n_groups == 0`
    pub fn build(self) -> Result<FMConfig, ConfigError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl FMConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !self.init_std.is_finite() || self.init_std < 0.0 {
            return Err(ConfigError::InvalidInitStd(self.init_std));
        }
        if self.n_groups == 0 {
            return Err(ConfigError::InvalidNGroups);
        }
        Ok(())
    }

    /// Fresh generator seeded with [`seed`](Self::seed).
    pub fn rng(&self) -> Xoshiro256PlusPlus {
        Xoshiro256PlusPlus::seed_from_u64(self.seed)
    }
}

impl Default for FMConfig {
    fn default() -> Self {
        Self::builder().build().expect("default config is valid")
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_default_config_is_valid() {
        let config = FMConfig::default();
        assert_eq!(config.n_factors, 10);
        assert!((config.init_std - 0.1).abs() < 1e-12);
        assert_eq!(config.n_groups, 1);
        assert_eq!(config.seed, 42);
    }

    #[test]
    fn test_invalid_init_std_negative() {
        let result = FMConfig::builder().init_std(-0.1).build();
        assert!(matches!(result, Err(ConfigError::InvalidInitStd(_))));
    }

    #[test]
    fn test_invalid_init_std_nan() {
        let result = FMConfig::builder().init_std(f64::NAN).build();
        assert!(matches!(result, Err(ConfigError::InvalidInitStd(_))));
    }

    #[test]
    fn test_zero_init_std_is_valid() {
        assert!(FMConfig::builder().init_std(0.0).build().is_ok());
    }

    #[test]
    fn test_zero_factors_is_valid() {
        assert!(FMConfig::builder().n_factors(0).build().is_ok());
    }

    #[test]
    fn test_invalid_n_groups_zero() {
        let result = FMConfig::builder().n_groups(0).build();
        assert_eq!(result.unwrap_err(), ConfigError::InvalidNGroups);
    }

    #[test]
    fn test_rng_is_reproducible() {
        let config = FMConfig::builder().seed(5).build().unwrap();
        let a: u64 = config.rng().gen();
        let b: u64 = config.rng().gen();
        assert_eq!(a, b);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            ConfigError::InvalidNGroups.to_string(),
            "n_groups must be at least 1"
        );
    }
}
