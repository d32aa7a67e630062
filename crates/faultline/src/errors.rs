//! Construction-time error types.
//!
//! Delivery outcomes are not errors; they are reported as
//! [`crate::Outcome`] values. Only programmer errors in configuration
//! surface as `Result::Err`.

use thiserror::Error;

/// Errors raised while constructing a client.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid collector endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error("Failed to create HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
