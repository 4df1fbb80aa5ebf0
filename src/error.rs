// Error types for tau-cli.
// Covers remote service failures, cache I/O, and terminal errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TauError {
    #[error("Request failed: {0}")]
    Api(#[from] reqwest::Error),

    #[error("Authentication failed: check your username, ID and password")]
    Unauthorized,

    #[error("{service} error: {message}")]
    Remote {
        service: &'static str,
        message: String,
    },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not determine the home directory")]
    MissingHomeDir,

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, TauError>;
