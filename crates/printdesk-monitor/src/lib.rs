//! # printdesk-monitor: Printer Monitoring Engine
//!
//! This crate keeps the shop's registered printers in the record store in
//! line with what the operating system reports, and pushes changes to the
//! dashboard.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Monitoring Architecture                          │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                 PrinterGateway (Command Gateway)                 │  │
//! │  │                                                                  │  │
//! │  │  Managed as Tauri state, called by the printer_* commands        │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │                                         │
//! │         ┌─────────────────────┼─────────────────────┐                  │
//! │         ▼                     ▼                     ▼                   │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │ SystemProber   │  │ Monitoring     │  │ PrinterRepository      │    │
//! │  │                │  │ Session        │  │ (printdesk-store)      │    │
//! │  │ PowerShell or  │  │                │  │                        │    │
//! │  │ lpstat, with   │  │ Interval timer │  │ Fetch registered rows  │    │
//! │  │ a timeout      │  │ Snapshot diff  │  │ Write status/heartbeat │    │
//! │  └────────────────┘  └────────────────┘  └────────────────────────┘    │
//! │                                                                         │
//! │  STATUS EVENTS (to Frontend via Tauri):                                │
//! │  • "printer:status-changed" - Full mapped printer list after a change  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`gateway`] - `PrinterGateway`, the operations the dashboard invokes
//! - [`session`] - Polling lifecycle and change detection
//! - [`probe`] - OS printer enumeration
//! - [`events`] - Status push channel
//! - [`response`] - Request and response payloads
//! - [`config`] - Monitor configuration (interval, timeouts, store)
//! - [`error`] - Monitor error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use printdesk_monitor::{MonitorConfig, MonitorRequest, PrinterGateway};
//!
//! let config = MonitorConfig::load_or_default(None);
//! let gateway = PrinterGateway::new(config)?;
//!
//! let res = gateway
//!     .start_monitoring(MonitorRequest::new(shop_id, access_token))
//!     .await;
//! println!("{:?}", res.message);
//!
//! gateway.stop_monitoring().await;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod events;
pub mod gateway;
pub mod probe;
pub mod response;
pub mod session;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{MonitorConfig, MonitorSettings, StoreSettings};
pub use error::{MonitorError, MonitorResult};
pub use events::{
    ChannelEmitter, NoOpEmitter, PrinterEventEmitter, StatusSubscription, STATUS_CHANGED_EVENT,
};
pub use gateway::{PrinterGateway, PrinterGatewayBuilder};
pub use probe::{
    CommandRunner, Platform, PrinterProbe, StaticProbe, SystemProber, TokioCommandRunner,
};
pub use response::{
    DetectResponse, ErrorCode, MonitorRequest, MonitoringStateResponse, StartMonitoringResponse,
    StatusResponse, StopResponse, SyncResponse,
};
pub use session::{MonitoringSession, PassOutcome, StartOutcome, StatusUpdates};
