//! Error types for cloudmail-client

use thiserror::Error;

/// Embedded code reported for failures that never reached the API.
pub const LOCAL_FAILURE_CODE: i64 = -1;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Authentication failed ({code}): {message}")]
    Authentication { code: i64, message: String },

    #[error("Not authenticated: acquire a token before querying mail")]
    Unauthenticated,

    #[error("Mail query failed ({code}): {message}")]
    Query { code: i64, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Numeric code of this failure.
    ///
    /// API-reported failures carry the embedded status code from the
    /// response body; everything else reports [`LOCAL_FAILURE_CODE`].
    #[must_use]
    pub const fn code(&self) -> i64 {
        match self {
            Self::Authentication { code, .. } | Self::Query { code, .. } => *code,
            _ => LOCAL_FAILURE_CODE,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
