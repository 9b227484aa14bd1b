use thiserror::Error;

#[derive(Error, Debug)]
pub enum LookbookError {
    #[error("Decode failed: {0}")]
    DecodeFailed(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),
}

pub type Result<T> = std::result::Result<T, LookbookError>;
