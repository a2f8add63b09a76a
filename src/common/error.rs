//! Error types for the RFQ harness
//!
//! HTTP failures are split the same way an operator reads them: the service
//! answered with a bad status, the service never answered, or something else
//! went wrong on our side.

use thiserror::Error;

use crate::api::webhook::ErrorResponse;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the harness
#[derive(Error, Debug)]
pub enum Error {
    // === HTTP Errors ===
    #[error("Request to {url} failed with status {status}: {body}")]
    UnexpectedStatus {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Request to {url} failed: no response from server ({reason})")]
    NoResponse { url: String, reason: String },

    #[error("Unknown error: {0}")]
    Http(#[from] reqwest::Error),

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    #[error("{0} is not set")]
    MissingSetting(&'static str),

    // === Keypair / Transaction Errors ===
    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    #[error("Invalid keypair '{path}': {reason}")]
    Keypair { path: String, reason: String },

    #[error("Invalid transaction: {0}")]
    Transaction(String),

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Test Errors ===
    #[error("Test assertion failed: {0}")]
    TestAssertion(String),

    #[error("Suite timed out after {0} seconds")]
    SuiteTimeout(u64),
}

impl Error {
    /// Create an unexpected status error, pulling the service's error text
    /// out of a JSON body when there is one
    pub fn unexpected_status(url: &str, status: u16, body: &str) -> Self {
        let body = serde_json::from_str::<ErrorResponse>(body)
            .map(|e| e.message)
            .unwrap_or_else(|_| body.to_string());

        Self::UnexpectedStatus {
            url: url.to_string(),
            status,
            body,
        }
    }

    /// Classify a transport error: no response at all versus anything else
    pub fn from_transport(url: &str, error: reqwest::Error) -> Self {
        if error.is_timeout() || error.is_connect() || error.is_request() {
            Self::NoResponse {
                url: url.to_string(),
                reason: error.to_string(),
            }
        } else {
            Self::Http(error)
        }
    }

    /// Create a keypair error
    pub fn keypair(path: &str, reason: impl ToString) -> Self {
        Self::Keypair {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create an assertion failure
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::TestAssertion(message.into())
    }

    /// HTTP status carried by this error, if the service answered
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
