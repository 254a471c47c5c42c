//! # Domain Types
//!
//! Printer types shared between the OS probe, the record store and the
//! dashboard.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────────┐            ┌──────────────────────────┐       │
//! │  │   ProbedPrinter     │  matched   │   RegisteredPrinter      │       │
//! │  │  ─────────────────  │  by name   │  ──────────────────────  │       │
//! │  │  name (OS key)      │ ─────────► │  id (store PK)           │       │
//! │  │  isDefault          │ (no case)  │  shop_id                 │       │
//! │  │  status             │            │  printer_name            │       │
//! │  │  driver, port       │            │  status, last_heartbeat  │       │
//! │  └─────────────────────┘            └──────────────────────────┘       │
//! │     ephemeral, per probe              persistent, per shop             │
//! │                                                                         │
//! │                    ┌─────────────────────┐                              │
//! │                    │   PrinterStatus     │                              │
//! │                    │  online | offline   │                              │
//! │                    │  error              │                              │
//! │                    └─────────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Shapes
//! `ProbedPrinter` crosses the IPC boundary in camelCase (`isDefault`).
//! `RegisteredPrinter` keeps the record store's snake_case column names so the
//! same struct decodes store rows and is pushed to the dashboard unchanged.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

// =============================================================================
// Printer Status
// =============================================================================

/// Live status of a printer as seen by the shop.
///
/// ## Normalization Policy
/// ```text
/// ready / idle / printing / warming up   ──►  Online
/// stopped / disabled / offline / paused  ──►  Offline
/// anything else                          ──►  Error
/// ```
/// Unknown states land on `Error` so they show up on the dashboard instead
/// of silently looking healthy or absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PrinterStatus {
    /// Ready to accept jobs.
    Online,
    /// Present but not accepting jobs, or not detected at all.
    #[default]
    Offline,
    /// Reported in a state we cannot classify.
    #[serde(other)]
    Error,
}

impl PrinterStatus {
    /// Returns the lowercase wire name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PrinterStatus::Online => "online",
            PrinterStatus::Offline => "offline",
            PrinterStatus::Error => "error",
        }
    }

    /// Maps a Windows spooler status code (`Win32_Printer.PrinterStatus`).
    ///
    /// | Code | Meaning    | Status  |
    /// |------|------------|---------|
    /// | 3    | Idle       | Online  |
    /// | 4    | Printing   | Online  |
    /// | 5    | Warming up | Online  |
    /// | 6    | Stopped    | Offline |
    /// | 7    | Offline    | Offline |
    pub fn from_spooler_code(code: i64) -> Self {
        match code {
            3..=5 => PrinterStatus::Online,
            6 | 7 => PrinterStatus::Offline,
            _ => PrinterStatus::Error,
        }
    }

    /// Maps a textual spooler state (CUPS words, Windows enum names).
    ///
    /// Matching ignores case, spaces, hyphens and underscores, so
    /// `"Warming Up"`, `"warming-up"` and `"WarmingUp"` are the same state.
    pub fn from_spooler_state(state: &str) -> Self {
        let key: String = state
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();

        match key.as_str() {
            "idle" | "normal" | "ready" | "printing" | "processing" | "warmingup"
            | "warmup" | "enabled" => PrinterStatus::Online,
            "disabled" | "stopped" | "stoppedprinting" | "offline" | "paused" | "rejecting" => {
                PrinterStatus::Offline
            }
            _ => PrinterStatus::Error,
        }
    }
}

impl std::fmt::Display for PrinterStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PrinterStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "online" => Ok(PrinterStatus::Online),
            "offline" => Ok(PrinterStatus::Offline),
            "error" => Ok(PrinterStatus::Error),
            other => Err(CoreError::InvalidStatus(other.to_string())),
        }
    }
}

// =============================================================================
// Probed Printer
// =============================================================================

/// A printer reported by the operating system during one probe.
///
/// Never persisted. `driver` and `port` are informational and take no part in
/// change detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProbedPrinter {
    /// OS-reported printer identifier.
    pub name: String,

    /// Whether the OS marks this printer as its default.
    pub is_default: bool,

    /// Normalized live status.
    pub status: PrinterStatus,

    /// Driver name, when the platform reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,

    /// Port or device URI, when the platform reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
}

impl ProbedPrinter {
    /// Creates a non-default printer with no driver/port details.
    pub fn new(name: impl Into<String>, status: PrinterStatus) -> Self {
        ProbedPrinter {
            name: name.into(),
            is_default: false,
            status,
            driver: None,
            port: None,
        }
    }

    /// Sets the driver name.
    pub fn with_driver(mut self, driver: impl Into<String>) -> Self {
        self.driver = Some(driver.into());
        self
    }

    /// Sets the port.
    pub fn with_port(mut self, port: impl Into<String>) -> Self {
        self.port = Some(port.into());
        self
    }

    /// Marks the printer as the OS default.
    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }
}

// =============================================================================
// Registered Printer
// =============================================================================

/// A printer a shop owner registered in the record store.
///
/// Only `status` and `last_heartbeat` are ever changed by this workspace; the
/// descriptive fields are carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RegisteredPrinter {
    /// Record store primary key.
    pub id: String,

    /// Owning shop.
    pub shop_id: String,

    /// Must match a probed printer's `name` (case-insensitive) to go online.
    pub printer_name: String,

    /// Free-form printer category chosen at registration.
    #[serde(default, deserialize_with = "null_as_default")]
    pub printer_type: String,

    /// Services this printer is offered for.
    #[serde(default, deserialize_with = "null_as_default")]
    pub supported_services: Vec<String>,

    /// Paper sizes this printer accepts.
    #[serde(default, deserialize_with = "null_as_default")]
    pub supported_sizes: Vec<String>,

    /// Last reconciled status.
    #[serde(default)]
    pub status: PrinterStatus,

    /// When the status was last evaluated. `None` until the first pass.
    ///
    /// Only ever overwritten, so a value that doesn't parse decodes as `None`.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    #[ts(as = "Option<String>")]
    pub last_heartbeat: Option<DateTime<Utc>>,
}

impl RegisteredPrinter {
    /// Creates a freshly registered (offline, never evaluated) printer.
    pub fn new(
        id: impl Into<String>,
        shop_id: impl Into<String>,
        printer_name: impl Into<String>,
    ) -> Self {
        RegisteredPrinter {
            id: id.into(),
            shop_id: shop_id.into(),
            printer_name: printer_name.into(),
            printer_type: String::new(),
            supported_services: Vec::new(),
            supported_sizes: Vec::new(),
            status: PrinterStatus::Offline,
            last_heartbeat: None,
        }
    }

    /// Returns a copy carrying a newly evaluated status.
    pub fn with_status(&self, status: PrinterStatus, evaluated_at: DateTime<Utc>) -> Self {
        RegisteredPrinter {
            status,
            last_heartbeat: Some(evaluated_at),
            ..self.clone()
        }
    }
}

/// Treats an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parses RFC 3339 or offset-less (assumed UTC) timestamps; anything else is `None`.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(serde_json::Value::as_str).and_then(parse_timestamp))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

// =============================================================================
// Unit Tests
// =============================================================================
