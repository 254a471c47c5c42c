//! # Printer Commands
//!
//! Tauri commands for printer detection and status monitoring.
//!
//! ## Command Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Printer Commands                                 │
//! │                                                                         │
//! │  printer_detect_system()       - Printers the OS reports right now     │
//! │  printer_get_status(name)      - One printer by name, or null          │
//! │  printer_start_monitoring(req) - Begin polling the shop's printers     │
//! │  printer_stop_monitoring()     - Stop polling                          │
//! │  printer_sync_status(req)      - One pass, persisted, list returned    │
//! │  printer_is_monitoring()       - Whether polling is active             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tauri::State;
use tracing::debug;

use printdesk_monitor::{
    DetectResponse, MonitorRequest, MonitoringStateResponse, StartMonitoringResponse,
    StatusResponse, StopResponse, SyncResponse,
};

use crate::state::PrinterState;

/// Lists the printers installed on this machine.
#[tauri::command]
pub async fn printer_detect_system(
    printers: State<'_, PrinterState>,
) -> tauri::Result<DetectResponse> {
    debug!("printer_detect_system command");
    Ok(printers.detect_system_printers().await)
}

/// Looks up one installed printer by name (case-insensitive).
///
/// ## Returns
/// `status: null` when no installed printer has that name.
#[tauri::command]
pub async fn printer_get_status(
    printers: State<'_, PrinterState>,
    printer_name: String,
) -> tauri::Result<StatusResponse> {
    debug!(printer_name = %printer_name, "printer_get_status command");
    Ok(printers.get_printer_status(&printer_name).await)
}

/// Starts monitoring the shop's registered printers.
///
/// Status changes arrive as `printer:status-changed` events.
#[tauri::command]
pub async fn printer_start_monitoring(
    printers: State<'_, PrinterState>,
    request: MonitorRequest,
) -> tauri::Result<StartMonitoringResponse> {
    debug!(shop_id = %request.shop_id, "printer_start_monitoring command");
    Ok(printers.start_monitoring(request).await)
}

/// Stops monitoring. Succeeds even when nothing is running.
#[tauri::command]
pub async fn printer_stop_monitoring(
    printers: State<'_, PrinterState>,
) -> tauri::Result<StopResponse> {
    debug!("printer_stop_monitoring command");
    Ok(printers.stop_monitoring().await)
}

/// Runs one reconciliation pass and returns the updated printers.
#[tauri::command]
pub async fn printer_sync_status(
    printers: State<'_, PrinterState>,
    request: MonitorRequest,
) -> tauri::Result<SyncResponse> {
    debug!(shop_id = %request.shop_id, "printer_sync_status command");
    Ok(printers.sync_printer_status(request).await)
}

#[tauri::command]
pub fn printer_is_monitoring(printers: State<'_, PrinterState>) -> MonitoringStateResponse {
    printers.is_monitoring()
}
