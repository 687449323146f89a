use std::fmt;

use thiserror::Error;

/// Errors produced by a single API call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-success status.
    #[error("HTTP {code}{}", detail_suffix(.message))]
    Status { code: u16, message: Option<String> },

    /// The request never produced a response (connect, TLS, bad header...).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body could not be decoded.
    #[error("invalid response body: {0}")]
    Decode(String),
}

fn detail_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {}", m))
        .unwrap_or_default()
}

impl ApiError {
    /// Numeric status code, when the server produced one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Status { code, .. } => Some(*code),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            ApiError::Decode(_) => None,
        }
    }
}

/// A failed read as the table shows it: the status code when there is one,
/// otherwise a short description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadFailure {
    pub status: Option<u16>,
    pub message: String,
}

impl From<&ApiError> for ReadFailure {
    fn from(err: &ApiError) -> Self {
        Self {
            status: err.status_code(),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for ReadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(code) => write!(f, "Error: {}", code),
            None => write!(f, "Error: {}", self.message),
        }
    }
}
