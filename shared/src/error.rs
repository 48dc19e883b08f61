use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to access vote file: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to encode vote data: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Secure random source unavailable")]
    Random,
}

pub type Result<T> = std::result::Result<T, StoreError>;
