//! # Printer State Module
//!
//! Holds the printer gateway and bridges status pushes onto Tauri events.
//!
//! ## Event Flow
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────────┐
//! │  Frontend                                                                │
//! │  ────────                                                                │
//! │                                                                          │
//! │  import { listen } from '@tauri-apps/api/event';                         │
//! │                                                                          │
//! │  const unlisten = await listen('printer:status-changed', (event) => {    │
//! │    setPrinters(event.payload);                                           │
//! │  });                                                                     │
//! │                                                                          │
//! │  // on unmount                                                           │
//! │  unlisten();                                                             │
//! └──────────────────────────────────────────────────────────────────────────┘
//! ```

use std::ops::Deref;

use tauri::{AppHandle, Emitter};
use tracing::{debug, error};

use printdesk_core::RegisteredPrinter;
use printdesk_monitor::{PrinterEventEmitter, PrinterGateway, STATUS_CHANGED_EVENT};

/// Printer gateway managed by Tauri.
pub struct PrinterState {
    gateway: PrinterGateway,
}

impl PrinterState {
    pub fn new(gateway: PrinterGateway) -> Self {
        PrinterState { gateway }
    }
}

impl Deref for PrinterState {
    type Target = PrinterGateway;

    fn deref(&self) -> &Self::Target {
        &self.gateway
    }
}

/// Tauri-based printer event emitter.
///
/// Forwards every status push to the webview as `printer:status-changed`.
#[derive(Clone)]
pub struct TauriPrinterEventEmitter {
    app_handle: AppHandle,
}

impl TauriPrinterEventEmitter {
    pub fn new(app_handle: AppHandle) -> Self {
        Self { app_handle }
    }
}

impl PrinterEventEmitter for TauriPrinterEventEmitter {
    fn emit_status_changed(&self, printers: &[RegisteredPrinter]) {
        if let Err(e) = self.app_handle.emit(STATUS_CHANGED_EVENT, printers) {
            error!(?e, "Failed to emit {} event", STATUS_CHANGED_EVENT);
            return;
        }

        debug!(count = printers.len(), "Emitted {}", STATUS_CHANGED_EVENT);
    }
}
