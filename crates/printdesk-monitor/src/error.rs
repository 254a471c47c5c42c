//! # Monitor Error Types
//!
//! Error types for probing, monitoring and the command gateway.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Monitor Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │     Request     │  │     Record Store        │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Validation     │  │  Credentials            │ │
//! │  │  InvalidUrl     │  │                 │  │  StoreQuery             │ │
//! │  │  ConfigLoad/Save│  │                 │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐                                                   │
//! │  │      Probe      │                                                   │
//! │  │                 │                                                   │
//! │  │  Probe          │                                                   │
//! │  │  ProbeTimeout   │                                                   │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Probe errors never leave the prober; it logs them and reports no printers.
//! Per-printer write failures are not errors here at all, they are collected
//! in a [`printdesk_store::PersistReport`].

use printdesk_core::ValidationError;
use printdesk_store::StoreError;
use thiserror::Error;

use crate::response::ErrorCode;

/// Result type alias for monitor operations.
pub type MonitorResult<T> = Result<T, MonitorError>;

/// Monitor error type.
#[derive(Debug, Error)]
pub enum MonitorError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid monitor configuration.
    #[error("Invalid monitor configuration: {0}")]
    InvalidConfig(String),

    /// Invalid record store URL.
    #[error("Invalid store URL: {0}")]
    InvalidUrl(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Request Errors
    // =========================================================================
    /// A boundary request failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    // =========================================================================
    // Probe Errors
    // =========================================================================
    /// An OS printer command failed or produced unusable output.
    #[error("Printer probe failed: {0}")]
    Probe(String),

    /// An OS printer command did not finish in time.
    #[error("Printer command `{command}` timed out after {secs} seconds")]
    ProbeTimeout { command: String, secs: u64 },

    // =========================================================================
    // Record Store Errors
    // =========================================================================
    /// Missing, expired or rejected access token.
    #[error("{0}")]
    Credentials(String),

    /// Fetching registered printers failed.
    #[error("Failed to load registered printers: {0}")]
    StoreQuery(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<StoreError> for MonitorError {
    fn from(err: StoreError) -> Self {
        match err {
            e if e.is_credential_error() => MonitorError::Credentials(e.to_string()),
            StoreError::InvalidUrl(msg) => MonitorError::InvalidUrl(msg),
            other => MonitorError::StoreQuery(other.to_string()),
        }
    }
}

impl From<std::io::Error> for MonitorError {
    fn from(err: std::io::Error) -> Self {
        MonitorError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for MonitorError {
    fn from(err: toml::de::Error) -> Self {
        MonitorError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for MonitorError {
    fn from(err: toml::ser::Error) -> Self {
        MonitorError::ConfigSaveFailed(err.to_string())
    }
}

impl From<url::ParseError> for MonitorError {
    fn from(err: url::ParseError) -> Self {
        MonitorError::InvalidUrl(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl MonitorError {
    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            MonitorError::InvalidConfig(_)
                | MonitorError::InvalidUrl(_)
                | MonitorError::ConfigLoadFailed(_)
                | MonitorError::ConfigSaveFailed(_)
        )
    }

    /// Returns true if this error came from the OS printer commands.
    pub fn is_probe_error(&self) -> bool {
        matches!(
            self,
            MonitorError::Probe(_) | MonitorError::ProbeTimeout { .. }
        )
    }

    /// Machine-readable code sent to the dashboard alongside the message.
    pub fn code(&self) -> ErrorCode {
        match self {
            MonitorError::Credentials(_) => ErrorCode::Credentials,
            MonitorError::StoreQuery(_) => ErrorCode::StoreQuery,
            MonitorError::Validation(_) => ErrorCode::Validation,
            e if e.is_config_error() => ErrorCode::Config,
            _ => ErrorCode::Internal,
        }
    }
}
