use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Failed to read dataset file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse dataset JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),
}
