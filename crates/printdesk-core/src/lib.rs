//! # printdesk-core: Pure Printer Reconciliation
//!
//! This crate holds the printer-state logic of PrintDesk as pure functions
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   OS spooler ──► printdesk-monitor (probe) ──► ProbedPrinter[]          │
//! │                                                   │                     │
//! │                                                   ▼                     │
//! │                      ┌─────────────────────────────────────┐           │
//! │                      │          printdesk-core             │           │
//! │                      │                                     │           │
//! │                      │  Snapshot::has_changed(current)     │           │
//! │                      │  map_printers(probed, registered)   │           │
//! │                      └──────────────────┬──────────────────┘           │
//! │                                         │                               │
//! │                                         ▼                               │
//! │                            RegisteredPrinter[] (status, heartbeat)      │
//! │                                         │                               │
//! │                     printdesk-store ◄───┴───► dashboard push            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Printer types shared with the dashboard
//! - [`reconcile`] - Mapping and change detection
//! - [`error`] - Domain error types
//! - [`validation`] - Boundary request validation
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::Utc;
//! use printdesk_core::{map_printers, PrinterStatus, ProbedPrinter, RegisteredPrinter};
//!
//! let probed = vec![ProbedPrinter::new("hp laserjet", PrinterStatus::Online)];
//! let registered = vec![RegisteredPrinter::new("p1", "shop-1", "HP LaserJet")];
//!
//! let mapped = map_printers(&probed, &registered, Utc::now());
//! assert_eq!(mapped[0].status, PrinterStatus::Online);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod reconcile;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use reconcile::{find_printer, has_changed, map_printers, normalize_name, Snapshot};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default delay between two monitoring passes (milliseconds).
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 10_000;

/// Shortest polling interval accepted from configuration.
///
/// Each pass shells out to the OS spooler, so sub-second polling would keep
/// a PowerShell or lpstat process permanently alive.
pub const MIN_POLL_INTERVAL_MS: u64 = 1_000;

/// Longest polling interval accepted from configuration (one hour).
pub const MAX_POLL_INTERVAL_MS: u64 = 3_600_000;

/// Record store table holding shop-registered printers.
pub const PRINTERS_TABLE: &str = "shop_printers";
