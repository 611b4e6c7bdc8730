use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
