use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Invalid input data: {0}")]
    InvalidData(String),

    #[error("Missing required option: {0}")]
    MissingOption(&'static str),

    #[error("Option '{0}' is not a callable strategy: {1}")]
    InvalidOptionType(&'static str, String),

    #[error("Purchase record references unknown seller '{0}'")]
    UnknownSeller(String),

    #[error("Line item references unknown product sku '{0}'")]
    UnknownProduct(String),

    #[error("Amount overflowed while calculating {0}")]
    Overflow(&'static str),
}
