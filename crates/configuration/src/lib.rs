use crate::error::ConfigError;
use rust_decimal::Decimal;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{BonusParams, Config, ReportFormat, ReportSettings, Strategies};

/// The file looked up when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "report.toml";

/// Prefix for environment variable overrides, e.g. `SALES_REPORT_BONUS__TOP_PCT=0.2`.
pub const ENV_PREFIX: &str = "SALES_REPORT";

/// Loads the report configuration.
///
/// Reads `path` (or `report.toml` in the working directory when `None`), layers
/// `SALES_REPORT_*` environment variables on top, deserializes into our
/// strongly-typed `Config` struct and validates it. A missing default file is
/// not an error; an explicitly requested file must exist.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let file_source = match path {
        Some(path) => config::File::from(path).required(true),
        None => {
            if !Path::new(DEFAULT_CONFIG_FILE).exists() {
                tracing::warn!(
                    "No {} found, falling back to default report settings.",
                    DEFAULT_CONFIG_FILE
                );
            }
            config::File::with_name(DEFAULT_CONFIG_FILE).required(false)
        }
    };

    let builder = config::Config::builder()
        .add_source(file_source)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    validate(&config)?;

    Ok(config)
}

/// Checks that the loaded values are usable by the analyzer.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    let bonus = &config.bonus;
    for (name, pct) in [
        ("top_pct", bonus.top_pct),
        ("runner_up_pct", bonus.runner_up_pct),
        ("default_pct", bonus.default_pct),
    ] {
        if pct < Decimal::ZERO || pct > Decimal::ONE {
            return Err(ConfigError::ValidationError(format!(
                "bonus.{name} must be between 0 and 1, got {pct}"
            )));
        }
    }

    if config.report.top_products_limit == 0 {
        return Err(ConfigError::ValidationError(
            "report.top_products_limit must be greater than 0".to_string(),
        ));
    }

    Ok(())
}
