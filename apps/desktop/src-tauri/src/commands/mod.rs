//! # Tauri Commands Module
//!
//! All commands exposed to the dashboard.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── printer.rs  ◄─── Detection, status, monitoring lifecycle, sync
//! └── config.rs   ◄─── Configuration retrieval
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Tauri Command Flow                                   │
//! │                                                                         │
//! │  Dashboard                                                              │
//! │  ─────────                                                              │
//! │  import { invoke } from '@tauri-apps/api/core';                         │
//! │                                                                         │
//! │  const res = await invoke('printer_start_monitoring', {                 │
//! │    request: { shopId, accessToken }                                     │
//! │  });                                                                    │
//! │         │                                                               │
//! │         │ (IPC via WebView)                                             │
//! │         ▼                                                               │
//! │  Rust Backend                                                           │
//! │  ────────────                                                           │
//! │  #[tauri::command]                                                      │
//! │  async fn printer_start_monitoring(                                     │
//! │      printers: State<'_, PrinterState>,  ◄── Injected by Tauri         │
//! │      request: MonitorRequest,            ◄── From invoke params        │
//! │  ) -> tauri::Result<StartMonitoringResponse>                            │
//! │         │                                                               │
//! │         │ (JSON serialization)                                          │
//! │         ▼                                                               │
//! │  Dashboard receives: { success, message, printers }                     │
//! │                  or: { success: false, error, errorCode }               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Failures travel inside the response body, so the dashboard never has to
//! `catch` an invoke.

pub mod config;
pub mod printer;
