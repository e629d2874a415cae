use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BlockrError {
    #[error("Contact not found: {0}")]
    ContactNotFound(String),

    #[error("Schedule rule not found: {0}")]
    RuleNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Store file {} is not valid JSON: {source}", .path.display())]
    CorruptStore {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, BlockrError>;
