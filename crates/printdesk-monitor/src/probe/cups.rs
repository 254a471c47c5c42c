//! # CUPS `lpstat` Output
//!
//! Parsers for `lpstat -p` and `lpstat -d`, used on macOS and Linux. Both
//! commands run with `LC_ALL=C` so the English phrasing below is stable.
//!
//! ```text
//! printer HP_LaserJet is idle.  enabled since Mon 01 Jan 2024 10:00:00 AM UTC
//! printer Canon_MX now printing Canon_MX-42.  enabled since ...
//!         Rendering completed                      <- reason line, skipped
//! printer Epson disabled since Tue 02 Jan 2024 ... -
//! system default destination: HP_LaserJet
//! no system default destination
//! ```

use tracing::debug;

use printdesk_core::{PrinterStatus, ProbedPrinter};

/// Parses `lpstat -p`. Lines that don't describe a printer are ignored.
pub fn parse_printers(output: &str) -> Vec<ProbedPrinter> {
    output.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<ProbedPrinter> {
    let rest = line.strip_prefix("printer ")?;
    let mut words = rest.split_whitespace();

    let name = words.next()?;
    let state = match words.next() {
        Some("is") => words.next(),
        Some("now") => words.next(),
        other => other,
    };

    let Some(state) = state else {
        debug!(line, "Skipping lpstat line without a state");
        return None;
    };

    let state = state.trim_end_matches(['.', ',', ';']);
    Some(ProbedPrinter::new(name, PrinterStatus::from_spooler_state(state)))
}

/// Parses `lpstat -d`.
pub fn parse_default(output: &str) -> Option<String> {
    output.lines().find_map(|line| {
        line.trim()
            .strip_prefix("system default destination:")
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
    })
}
