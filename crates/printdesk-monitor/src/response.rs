//! # Gateway Requests and Responses
//!
//! Payloads exchanged with the dashboard. Every response carries `success`;
//! failures add a human-readable `error` and a machine-readable `errorCode`.
//!
//! ```json
//! { "success": false, "error": "Not authenticated", "errorCode": "CREDENTIALS" }
//! ```
//!
//! ## Usage in Frontend
//! ```typescript
//! const res = await invoke<StartMonitoringResponse>('printer_start_monitoring', { request });
//! if (!res.success) {
//!   switch (res.errorCode) {
//!     case 'CREDENTIALS': redirectToLogin(); break;
//!     default: toast.error(res.error);
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use ts_rs::TS;

use printdesk_core::{ProbedPrinter, RegisteredPrinter};

use crate::error::MonitorError;

// =============================================================================
// Error Code
// =============================================================================

/// Error codes for gateway responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Access token missing, expired or rejected.
    Credentials,
    /// Registered printers could not be loaded.
    StoreQuery,
    /// Request field missing or malformed.
    Validation,
    /// Local configuration is unusable.
    Config,
    /// Anything else.
    Internal,
}

/// Message and code for a failed operation, logged once here.
fn describe(err: &MonitorError) -> (Option<String>, Option<ErrorCode>) {
    let code = err.code();
    match code {
        ErrorCode::Internal | ErrorCode::Config => error!(?err, ?code, "Printer operation failed"),
        _ => warn!(error = %err, ?code, "Printer request rejected"),
    }
    (Some(err.to_string()), Some(code))
}

// =============================================================================
// Requests
// =============================================================================

/// Request for `printer:start-monitoring` and `printer:sync-status`.
///
/// `storeUrl` / `storeKey` fall back to the configured store when omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MonitorRequest {
    pub shop_id: String,
    #[serde(default)]
    #[ts(optional)]
    pub access_token: Option<String>,
    #[serde(default)]
    #[ts(optional)]
    pub store_url: Option<String>,
    #[serde(default)]
    #[ts(optional)]
    pub store_key: Option<String>,
}

impl MonitorRequest {
    pub fn new(shop_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        MonitorRequest {
            shop_id: shop_id.into(),
            access_token: Some(access_token.into()),
            store_url: None,
            store_key: None,
        }
    }

    pub fn with_store(mut self, url: impl Into<String>, key: impl Into<String>) -> Self {
        self.store_url = Some(url.into());
        self.store_key = Some(key.into());
        self
    }
}

// =============================================================================
// Responses
// =============================================================================

/// Response for `printer:detect-system`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DetectResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub printers: Option<Vec<ProbedPrinter>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub error_code: Option<ErrorCode>,
}

impl DetectResponse {
    pub fn ok(printers: Vec<ProbedPrinter>) -> Self {
        DetectResponse {
            success: true,
            printers: Some(printers),
            error: None,
            error_code: None,
        }
    }
}

/// Response for `printer:get-status`. `status` is `null` when no printer matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub success: bool,
    pub status: Option<ProbedPrinter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub error_code: Option<ErrorCode>,
}

impl StatusResponse {
    pub fn ok(status: Option<ProbedPrinter>) -> Self {
        StatusResponse {
            success: true,
            status,
            error: None,
            error_code: None,
        }
    }
}

/// Response for `printer:start-monitoring`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StartMonitoringResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub printers: Option<Vec<RegisteredPrinter>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub error_code: Option<ErrorCode>,
}

impl StartMonitoringResponse {
    pub const STARTED: &'static str = "Monitoring started";
    pub const ALREADY_MONITORING: &'static str = "Already monitoring";
    pub const NO_PRINTERS: &'static str = "No printers registered yet";

    pub fn started(printers: Vec<RegisteredPrinter>) -> Self {
        Self::ok(Self::STARTED, Some(printers))
    }

    pub fn already_monitoring() -> Self {
        Self::ok(Self::ALREADY_MONITORING, None)
    }

    pub fn no_printers() -> Self {
        Self::ok(Self::NO_PRINTERS, Some(Vec::new()))
    }

    fn ok(message: &str, printers: Option<Vec<RegisteredPrinter>>) -> Self {
        StartMonitoringResponse {
            success: true,
            message: Some(message.to_string()),
            printers,
            error: None,
            error_code: None,
        }
    }

    pub fn failed(err: &MonitorError) -> Self {
        let (error, error_code) = describe(err);
        StartMonitoringResponse {
            success: false,
            message: None,
            printers: None,
            error,
            error_code,
        }
    }
}

/// Response for `printer:stop-monitoring`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StopResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub error_code: Option<ErrorCode>,
}

impl StopResponse {
    pub fn ok() -> Self {
        StopResponse {
            success: true,
            error: None,
            error_code: None,
        }
    }
}

/// Response for `printer:sync-status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub printers: Option<Vec<RegisteredPrinter>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub error_code: Option<ErrorCode>,
}

impl SyncResponse {
    pub fn ok(printers: Vec<RegisteredPrinter>) -> Self {
        SyncResponse {
            success: true,
            printers: Some(printers),
            error: None,
            error_code: None,
        }
    }

    pub fn failed(err: &MonitorError) -> Self {
        let (error, error_code) = describe(err);
        SyncResponse {
            success: false,
            printers: None,
            error,
            error_code,
        }
    }
}

/// Response for `printer:is-monitoring`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MonitoringStateResponse {
    pub success: bool,
    pub active: bool,
}
