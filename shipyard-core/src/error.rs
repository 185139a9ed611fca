//! Error types for Shipyard core.

use std::{error::Error, fmt};

/// Error type for Shipyard core operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShipyardError {
    /// The request was malformed or failed validation.
    BadRequest(String),
    /// A well-formed identifier did not match any ship.
    NotFound(String),
    /// The backing store failed to serve the request.
    Store(String),
}

impl ShipyardError {
    /// Build a bad request error from any message.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Build a not found error for a ship identifier.
    pub fn ship_not_found(id: i64) -> Self {
        Self::NotFound(format!("ship {id} not found"))
    }

    /// Build a store error from any displayable failure.
    pub fn store(err: impl fmt::Display) -> Self {
        Self::Store(err.to_string())
    }

    /// Returns the bare message without the error kind prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest(message) | Self::NotFound(message) | Self::Store(message) => message,
        }
    }
}

impl fmt::Display for ShipyardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadRequest(message) => write!(f, "bad request: {message}"),
            Self::NotFound(message) => write!(f, "not found: {message}"),
            Self::Store(message) => write!(f, "store error: {message}"),
        }
    }
}

impl Error for ShipyardError {}

/// Convenience result type for Shipyard core.
pub type Result<T> = std::result::Result<T, ShipyardError>;
