//! # Platform Prober
//!
//! Enumerates the printers the operating system knows about.
//!
//! ## Probe Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           SystemProber::probe                           │
//! │                                                                         │
//! │   Windows                          macOS / Linux                        │
//! │   ───────                          ─────────────                        │
//! │   powershell Win32_Printer ─┐      lpstat -p ─┐                         │
//! │   powershell default       ─┤      lpstat -d ─┤  (run concurrently)     │
//! │                             ▼                 ▼                         │
//! │                     parse list ──► mark default by exact name           │
//! │                                                                         │
//! │   list query fails ──► warn, return []                                  │
//! │   default query fails ──► debug, nobody is default                      │
//! │   other OS ──► warn, return []                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `probe()` never fails. An empty list means every registered printer is
//! reported offline downstream.

mod cups;
mod runner;
mod windows;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use printdesk_core::ProbedPrinter;

use crate::error::MonitorResult;

pub use runner::{CommandRunner, TokioCommandRunner};

// =============================================================================
// Probe Trait
// =============================================================================

/// Source of the OS printer list.
#[async_trait]
pub trait PrinterProbe: Send + Sync {
    /// Enumerates printers. Failures are logged and yield an empty list.
    async fn probe(&self) -> Vec<ProbedPrinter>;
}

// =============================================================================
// Platform
// =============================================================================

/// Operating system family, as far as printer enumeration is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
    Unsupported,
}

impl Platform {
    /// Platform this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(target_os = "linux") {
            Platform::Linux
        } else {
            Platform::Unsupported
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Platform::Windows => "windows",
            Platform::MacOs => "macos",
            Platform::Linux => "linux",
            Platform::Unsupported => "unsupported",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// System Prober
// =============================================================================

const POWERSHELL: &str = "powershell";
const LPSTAT: &str = "lpstat";

/// Prober backed by the OS print spooler commands.
pub struct SystemProber {
    platform: Platform,
    runner: Arc<dyn CommandRunner>,
}

impl SystemProber {
    /// Prober for the current platform, bounding each command by `timeout`.
    pub fn new(timeout: Duration) -> Self {
        Self::with_runner(Platform::current(), Arc::new(TokioCommandRunner::new(timeout)))
    }

    /// Prober with an explicit platform and command runner.
    pub fn with_runner(platform: Platform, runner: Arc<dyn CommandRunner>) -> Self {
        SystemProber { platform, runner }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    async fn try_probe(&self) -> MonitorResult<Vec<ProbedPrinter>> {
        let (list, default) = match self.platform {
            Platform::Windows => {
                let (list, default) = tokio::join!(
                    self.powershell(windows::LIST_PRINTERS),
                    self.powershell(windows::DEFAULT_PRINTER),
                );
                let printers = windows::parse_printers(&list?)?;
                (printers, default.map(|out| windows::parse_default(&out)))
            }
            Platform::MacOs | Platform::Linux => {
                let (list, default) = tokio::join!(
                    self.runner.run(LPSTAT, &["-p"]),
                    self.runner.run(LPSTAT, &["-d"]),
                );
                let printers = cups::parse_printers(&list?);
                (printers, default.map(|out| cups::parse_default(&out)))
            }
            Platform::Unsupported => {
                warn!(
                    os = std::env::consts::OS,
                    "Printer detection is not supported on this platform"
                );
                return Ok(Vec::new());
            }
        };

        let default = default.unwrap_or_else(|e| {
            debug!(?e, "Default printer query failed");
            None
        });

        Ok(mark_default(list, default.as_deref()))
    }

    async fn powershell(&self, script: &str) -> MonitorResult<String> {
        self.runner
            .run(POWERSHELL, &["-NoProfile", "-NonInteractive", "-Command", script])
            .await
    }
}

#[async_trait]
impl PrinterProbe for SystemProber {
    async fn probe(&self) -> Vec<ProbedPrinter> {
        match self.try_probe().await {
            Ok(printers) => {
                debug!(platform = %self.platform, count = printers.len(), "Printers probed");
                printers
            }
            Err(e) => {
                warn!(?e, platform = %self.platform, "Printer probe failed");
                Vec::new()
            }
        }
    }
}

fn mark_default(printers: Vec<ProbedPrinter>, default: Option<&str>) -> Vec<ProbedPrinter> {
    printers
        .into_iter()
        .map(|mut p| {
            p.is_default = default == Some(p.name.as_str());
            p
        })
        .collect()
}

// =============================================================================
// Static Probe
// =============================================================================

/// Probe returning a fixed, replaceable printer list. For tests.
#[derive(Debug, Default)]
pub struct StaticProbe {
    printers: Mutex<Vec<ProbedPrinter>>,
    calls: AtomicUsize,
}

impl StaticProbe {
    pub fn new(printers: Vec<ProbedPrinter>) -> Self {
        StaticProbe {
            printers: Mutex::new(printers),
            calls: AtomicUsize::new(0),
        }
    }

    /// Replaces the list returned by later probes.
    pub fn set(&self, printers: Vec<ProbedPrinter>) {
        *self.printers.lock().unwrap_or_else(|p| p.into_inner()) = printers;
    }

    /// Number of completed probes.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PrinterProbe for StaticProbe {
    async fn probe(&self) -> Vec<ProbedPrinter> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.printers
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }
}
