use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod optimizer_config;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_logging;
pub use optimizer_config::OptimizerParams;
pub use settings::{Config, DataSource, Logging, SimulationParams};

/// File looked up in the working directory when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "sentinel.toml";

/// Prefix for environment overrides, e.g. `SENTINEL__SIMULATION__FLAT_FEE=0.0002`.
pub const ENV_PREFIX: &str = "SENTINEL";

/// Loads and validates the application configuration.
///
/// Sources are layered as: built-in defaults, then the TOML file, then
/// `SENTINEL__*` environment variables. An explicit `path` must exist; the
/// default `sentinel.toml` is optional.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let builder = config::Config::builder()
        .add_source(file)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(?config, "configuration loaded");
    Ok(config)
}
