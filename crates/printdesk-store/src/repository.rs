//! # Printer Repository
//!
//! Typed access to the table holding shop-registered printers.
//!
//! ## Write Path
//! ```text
//! persist_all([p1, p2, p3])
//!      │
//!      ├── update p1 ──► ok
//!      ├── update p2 ──► error ──► logged, recorded in report
//!      └── update p3 ──► ok
//!      │
//!      ▼
//! PersistReport { updated: 2, failed: [("p2", "...")] }
//! ```
//! Each printer is written on its own so one failing row never blocks the
//! others. Writes are last-write-wins; no version column is checked.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde_json::json;
use tracing::{error, info, warn};

use printdesk_core::RegisteredPrinter;

use crate::error::StoreResult;
use crate::record::{Filter, RecordStore};

/// Outcome of a batch of per-printer status writes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistReport {
    /// Rows written successfully.
    pub updated: usize,
    /// `(printer id, error message)` for every failed write.
    pub failed: Vec<(String, String)>,
}

impl PersistReport {
    /// Returns true when every write succeeded.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Repository for shop-registered printers.
#[derive(Clone)]
pub struct PrinterRepository {
    store: Arc<dyn RecordStore>,
    table: String,
}

impl PrinterRepository {
    /// Creates a repository over `table`.
    pub fn new(store: Arc<dyn RecordStore>, table: impl Into<String>) -> Self {
        PrinterRepository {
            store,
            table: table.into(),
        }
    }

    /// Fetches every printer registered for `shop_id`, oldest first.
    ///
    /// Rows that do not decode are skipped with a warning.
    pub async fn fetch_for_shop(&self, shop_id: &str) -> StoreResult<Vec<RegisteredPrinter>> {
        let filter = Filter::new().eq("shop_id", shop_id).order_by("created_at");
        let rows = self.store.query(&self.table, &filter).await?;

        let printers: Vec<RegisteredPrinter> = rows
            .into_iter()
            .filter_map(|row| match serde_json::from_value::<RegisteredPrinter>(row) {
                Ok(printer) => Some(printer),
                Err(e) => {
                    warn!(?e, shop_id, "Skipping malformed printer row");
                    None
                }
            })
            .collect();

        info!(shop_id, count = printers.len(), "Fetched registered printers");
        Ok(printers)
    }

    /// Writes one printer's `status` and `last_heartbeat`.
    pub async fn update_status(&self, printer: &RegisteredPrinter) -> StoreResult<()> {
        let heartbeat = printer.last_heartbeat.unwrap_or_else(Utc::now);
        let fields = json!({
            "status": printer.status.as_str(),
            "last_heartbeat": heartbeat.to_rfc3339_opts(SecondsFormat::Millis, true),
        });

        self.store.update(&self.table, &printer.id, fields).await
    }

    /// Writes every printer independently and reports the outcome.
    pub async fn persist_all(&self, printers: &[RegisteredPrinter]) -> PersistReport {
        let mut report = PersistReport::default();

        for printer in printers {
            match self.update_status(printer).await {
                Ok(()) => report.updated += 1,
                Err(e) => {
                    error!(?e, printer_id = %printer.id, "Failed to update printer status");
                    report.failed.push((printer.id.clone(), e.to_string()));
                }
            }
        }

        info!(
            updated = report.updated,
            failed = report.failed.len(),
            "Updated {} printers",
            report.updated
        );
        report
    }
}
