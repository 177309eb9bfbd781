use crate::error::ConfigError;
use crate::optimizer_config::OptimizerParams;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section falls back to its defaults, so an empty file (or no file at
/// all) is a valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub simulation: SimulationParams,
    pub optimizer: OptimizerParams,
    pub data_source: DataSource,
    pub logging: Logging,
}

impl Config {
    /// Checks every section for values the engine cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.simulation.validate()?;
        self.optimizer.validate()?;
        self.data_source.validate()?;
        Ok(())
    }
}

/// Contains parameters for the simulation engine.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    /// Starting capital, in stable-asset units. Split 50/50 at the first price.
    pub initial_capital: f64,
    /// Proportional platform fee charged on the stable amount of every conversion.
    /// 0.0009 corresponds to 0.09%.
    pub platform_fee_rate: f64,
    /// Flat transaction fee, in volatile-asset units, charged once per conversion.
    pub flat_fee: f64,
    /// Volatile balance that is never sold, kept to cover future flat fees.
    pub reserve: f64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            initial_capital: 1000.0,
            platform_fee_rate: 0.0009,
            flat_fee: 0.0001,
            reserve: 0.01,
        }
    }
}

impl SimulationParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.initial_capital.is_finite() && self.initial_capital > 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "simulation.initial_capital must be positive, got {}",
                self.initial_capital
            )));
        }
        if !(0.0..1.0).contains(&self.platform_fee_rate) {
            return Err(ConfigError::ValidationError(format!(
                "simulation.platform_fee_rate must be in [0, 1), got {}",
                self.platform_fee_rate
            )));
        }
        if !(self.flat_fee.is_finite() && self.flat_fee >= 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "simulation.flat_fee must be non-negative, got {}",
                self.flat_fee
            )));
        }
        if !(self.reserve.is_finite() && self.reserve >= 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "simulation.reserve must be non-negative, got {}",
                self.reserve
            )));
        }
        Ok(())
    }
}

/// Where historical samples are read from when the CLI is not told otherwise.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DataSource {
    /// HTTP endpoint serving a JSON array of samples.
    pub url: Option<String>,
    /// Local JSON file with the same shape. Ignored when `url` is set.
    pub file: Option<PathBuf>,
    /// Request timeout for `url`, in seconds.
    pub timeout_secs: u64,
}

impl Default for DataSource {
    fn default() -> Self {
        Self {
            url: None,
            file: None,
            timeout_secs: 30,
        }
    }
}

impl DataSource {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "data_source.timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Logging output settings. `RUST_LOG` takes precedence over `level`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Logging {
    pub level: String,
    /// When set, logs are also written to a daily-rolling file in this directory.
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
    pub ansi: bool,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
            file_prefix: "sentinel.log".to_string(),
            ansi: true,
        }
    }
}
