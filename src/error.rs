// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StrangerError {
    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Grammar error: {0}")]
    Grammar(String),

    #[error("Generic error: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, StrangerError>;

// Allow `?` on std::io::Error by converting to StrangerError::Io with unknown path.
impl From<std::io::Error> for StrangerError {
    fn from(source: std::io::Error) -> Self {
        StrangerError::Io {
            source,
            path: PathBuf::from("<unknown>"),
        }
    }
}

// Gracefully convert WalkDir errors
impl From<walkdir::Error> for StrangerError {
    fn from(e: walkdir::Error) -> Self {
        StrangerError::Other(e.to_string())
    }
}
