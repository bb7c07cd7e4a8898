//! Error types for ddnsclient
//!
//! This module defines all error types used throughout the crate.

use crate::traits::AddressFamily;
use thiserror::Error;

/// Result type alias for ddnsclient operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for ddnsclient
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An address literal that does not parse for the expected family
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport-level HTTP failure (connection refused, timeout, TLS, ...)
    #[error("HTTP error: {0}")]
    Http(String),

    /// A discovery endpoint could not be resolved; fatal for the daemon run
    #[error("Could not resolve {family} address from {endpoint}: {reason}")]
    Resolve {
        /// Address family being resolved
        family: AddressFamily,
        /// Discovery endpoint that failed
        endpoint: String,
        /// Failure detail
        reason: String,
    },
}

impl Error {
    /// Create an invalid address error
    pub fn invalid_address(msg: impl Into<String>) -> Self {
        Self::InvalidAddress(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create a resolve error
    pub fn resolve(
        family: AddressFamily,
        endpoint: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Resolve {
            family,
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error ends the daemon run
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Resolve { .. })
    }
}
