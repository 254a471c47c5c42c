//! # State Module
//!
//! Manages application state for the Tauri desktop app.
//!
//! Commands declare exactly the state they need: printer commands take
//! [`PrinterState`], `get_config` takes [`ConfigState`].
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      Tauri Runtime                              │   │
//! │  │  app.manage(printer_state);                                     │   │
//! │  │  app.manage(config_state);                                      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                              │                                          │
//! │               ┌──────────────┴──────────────┐                          │
//! │               ▼                             ▼                           │
//! │  ┌─────────────────────────┐   ┌──────────────────────────┐            │
//! │  │     PrinterState        │   │      ConfigState         │            │
//! │  │                         │   │                          │            │
//! │  │  PrinterGateway         │   │  pollIntervalMs          │            │
//! │  │  (session, prober,      │   │  probeTimeoutSecs        │            │
//! │  │   store connections)    │   │  storeConfigured         │            │
//! │  │                         │   │  platform                │            │
//! │  └─────────────────────────┘   └──────────────────────────┘            │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • PrinterState: the gateway serializes start/stop internally          │
//! │  • ConfigState: Read-only after initialization                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod printer;

pub use config::ConfigState;
pub use printer::{PrinterState, TauriPrinterEventEmitter};
