//! # Store Error Types
//!
//! Error types for record store operations.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Store Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Credentials    │  │   Transport     │  │     Data                │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Missing        │  │  InvalidUrl     │  │  QueryFailed            │ │
//! │  │  TokenExpired   │  │  Connection     │  │  UpdateFailed           │ │
//! │  │  Unauthorized   │  │  Timeout        │  │  NotFound / Decode      │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Record store error type.
#[derive(Debug, Error)]
pub enum StoreError {
    // =========================================================================
    // Credential Errors
    // =========================================================================
    /// No access token was supplied.
    #[error("Not authenticated: access token is required")]
    MissingCredentials,

    /// The access token's `exp` claim is in the past.
    #[error("Session expired at {expired_at}")]
    TokenExpired { expired_at: DateTime<Utc> },

    /// The store rejected the credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// Store URL is malformed or uses an unsupported scheme.
    #[error("Invalid store URL: {0}")]
    InvalidUrl(String),

    /// The request never produced a response.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The request timed out.
    #[error("Request to record store timed out")]
    Timeout,

    /// The store answered with a status we do not handle.
    #[error("Unexpected response ({status}): {message}")]
    Unexpected { status: u16, message: String },

    // =========================================================================
    // Data Errors
    // =========================================================================
    /// A read against a table failed.
    #[error("Query on {table} failed: {message}")]
    QueryFailed { table: String, message: String },

    /// A write to one row failed.
    #[error("Update of {table}/{id} failed: {message}")]
    UpdateFailed {
        table: String,
        id: String,
        message: String,
    },

    /// An update matched no row.
    #[error("{table} row not found: {id}")]
    NotFound { table: String, id: String },

    /// Response body could not be decoded.
    #[error("Failed to decode store response: {0}")]
    Decode(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            StoreError::Timeout
        } else if err.is_decode() {
            StoreError::Decode(err.to_string())
        } else {
            StoreError::ConnectionFailed(err.to_string())
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Decode(err.to_string())
    }
}

impl From<url::ParseError> for StoreError {
    fn from(err: url::ParseError) -> Self {
        StoreError::InvalidUrl(err.to_string())
    }
}

impl StoreError {
    /// Returns true if the caller's credentials are the problem.
    pub fn is_credential_error(&self) -> bool {
        matches!(
            self,
            StoreError::MissingCredentials
                | StoreError::TokenExpired { .. }
                | StoreError::Unauthorized(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_errors() {
        assert!(StoreError::MissingCredentials.is_credential_error());
        assert!(StoreError::Unauthorized("bad jwt".into()).is_credential_error());
        assert!(StoreError::TokenExpired {
            expired_at: Utc::now()
        }
        .is_credential_error());
        assert!(!StoreError::Timeout.is_credential_error());
    }

    #[test]
    fn test_error_display() {
        let err = StoreError::UpdateFailed {
            table: "shop_printers".into(),
            id: "p1".into(),
            message: "HTTP 500".into(),
        };
        assert_eq!(err.to_string(), "Update of shop_printers/p1 failed: HTTP 500");
    }
}
