//! # Windows Spooler Output
//!
//! Parsers for the PowerShell queries the prober runs on Windows.
//!
//! `ConvertTo-Json` emits an array for two or more printers, a bare object for
//! exactly one, and nothing at all for none:
//! ```text
//! [{"Name":"HP LaserJet","PrinterStatus":3,"DriverName":"HP PCL6","PortName":"USB001"}, ...]
//! {"Name":"HP LaserJet","PrinterStatus":3,"DriverName":"HP PCL6","PortName":"USB001"}
//! <empty>
//! ```

use serde_json::Value;
use tracing::debug;

use printdesk_core::{PrinterStatus, ProbedPrinter};

use crate::error::{MonitorError, MonitorResult};

/// Enumerates printers with their spooler status, driver and port.
pub const LIST_PRINTERS: &str = "Get-CimInstance -ClassName Win32_Printer | \
     Select-Object Name, PrinterStatus, DriverName, PortName | ConvertTo-Json";

/// Prints the name of the default printer, if any.
pub const DEFAULT_PRINTER: &str = "Get-CimInstance -ClassName Win32_Printer | \
     Where-Object {$_.Default -eq $true} | Select-Object -ExpandProperty Name";

/// Parses the JSON produced by [`LIST_PRINTERS`].
///
/// Entries without a usable `Name` are skipped.
pub fn parse_printers(output: &str) -> MonitorResult<Vec<ProbedPrinter>> {
    let output = output.trim();
    if output.is_empty() {
        return Ok(Vec::new());
    }

    let entries = match serde_json::from_str::<Value>(output) {
        Ok(Value::Array(entries)) => entries,
        Ok(entry @ Value::Object(_)) => vec![entry],
        Ok(Value::Null) => Vec::new(),
        Ok(other) => {
            return Err(MonitorError::Probe(format!(
                "unexpected printer list shape: {}",
                other
            )))
        }
        Err(e) => {
            return Err(MonitorError::Probe(format!(
                "printer list is not JSON: {}",
                e
            )))
        }
    };

    Ok(entries.iter().filter_map(parse_entry).collect())
}

fn parse_entry(entry: &Value) -> Option<ProbedPrinter> {
    let name = match entry.get("Name").and_then(Value::as_str).map(str::trim) {
        Some(name) if !name.is_empty() => name,
        _ => {
            debug!(%entry, "Skipping printer entry without a name");
            return None;
        }
    };

    let mut printer = ProbedPrinter::new(name, parse_status(entry.get("PrinterStatus")));
    if let Some(driver) = non_empty(entry.get("DriverName")) {
        printer = printer.with_driver(driver);
    }
    if let Some(port) = non_empty(entry.get("PortName")) {
        printer = printer.with_port(port);
    }
    Some(printer)
}

fn parse_status(raw: Option<&Value>) -> PrinterStatus {
    match raw {
        Some(Value::Number(n)) => n
            .as_i64()
            .map(PrinterStatus::from_spooler_code)
            .unwrap_or(PrinterStatus::Error),
        Some(Value::String(s)) => match s.trim().parse::<i64>() {
            Ok(code) => PrinterStatus::from_spooler_code(code),
            Err(_) => PrinterStatus::from_spooler_state(s),
        },
        _ => PrinterStatus::Error,
    }
}

fn non_empty(raw: Option<&Value>) -> Option<&str> {
    raw.and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Parses the output of [`DEFAULT_PRINTER`]. Empty output means no default.
pub fn parse_default(output: &str) -> Option<String> {
    output
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}
