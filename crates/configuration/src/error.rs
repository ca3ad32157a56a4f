use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load report configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Invalid report configuration: {0}")]
    ValidationError(String),
}
