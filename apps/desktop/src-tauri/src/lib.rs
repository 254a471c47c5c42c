//! # PrintDesk Desktop Library
//!
//! Configures and runs the Tauri app.
//!
//! ## Module Organization
//! ```text
//! printdesk_desktop_lib/
//! ├── lib.rs          ◄─── You are here (Tauri setup & run)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── printer.rs  ◄─── Gateway state + Tauri event emitter
//! │   └── config.rs   ◄─── Configuration summary
//! └── commands/
//!     ├── mod.rs      ◄─── Command exports
//!     ├── printer.rs  ◄─── Detection, monitoring, sync commands
//!     └── config.rs   ◄─── Configuration retrieval
//! ```

pub mod commands;
pub mod state;

use std::sync::Arc;

use tauri::{Manager, RunEvent};
use tracing::info;
use tracing_subscriber::EnvFilter;

use printdesk_monitor::{MonitorConfig, PrinterGatewayBuilder};
use state::{ConfigState, PrinterState, TauriPrinterEventEmitter};

/// Runs the Tauri application.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter                                │
/// │     • Default: INFO, can be overridden with RUST_LOG                    │
/// │                                                                         │
/// │  2. Load Monitor Config ──────────────────────────────────────────────► │
/// │     • printdesk.toml in the platform config dir, then PRINTDESK_* env   │
/// │     • Falls back to defaults when unreadable                            │
/// │                                                                         │
/// │  3. Build Printer Gateway ────────────────────────────────────────────► │
/// │     • System prober for this OS                                         │
/// │     • Tauri emitter for "printer:status-changed"                        │
/// │                                                                         │
/// │  4. Build & Run Tauri App ────────────────────────────────────────────► │
/// │     • Register all commands                                             │
/// │     • Stop monitoring on exit                                           │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn run() {
    init_tracing();

    info!("Starting PrintDesk Desktop Application");

    let app = tauri::Builder::default()
        .setup(|app| {
            let config = MonitorConfig::load_or_default(None);
            let config_state = ConfigState::from_config(&config);

            let emitter = Arc::new(TauriPrinterEventEmitter::new(app.handle().clone()));
            let gateway = PrinterGatewayBuilder::new(config)
                .with_emitter(emitter)
                .build()?;

            app.manage(PrinterState::new(gateway));
            app.manage(config_state);

            info!("State initialized");
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // Printer commands
            commands::printer::printer_detect_system,
            commands::printer::printer_get_status,
            commands::printer::printer_start_monitoring,
            commands::printer::printer_stop_monitoring,
            commands::printer::printer_sync_status,
            commands::printer::printer_is_monitoring,
            // Config commands
            commands::config::get_config,
        ])
        .build(tauri::generate_context!())
        .expect("error while building tauri application");

    app.run(|handle, event| {
        if let RunEvent::Exit = event {
            if let Some(printers) = handle.try_state::<PrinterState>() {
                printers.shutdown();
            }
        }
    });
}

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "info,printdesk=debug,reqwest=warn,hyper=warn";

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=printdesk=trace` - Show trace for printdesk crates only
/// - Default: [`DEFAULT_LOG_FILTER`]
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
