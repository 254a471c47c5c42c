//! # Reconciliation
//!
//! Maps probed printers onto shop-registered printers and decides whether a
//! probe differs from the previous one.
//!
//! ## One Pass
//! ```text
//! probe() ──► ProbedPrinter[]
//!                  │
//!                  ▼
//!     ┌─────────────────────────────┐   no    ┌───────────────┐
//!     │ !snapshot.is_primed()       │ ──────► │  do nothing   │
//!     │   || snapshot.has_changed() │         │  (no writes)  │
//!     └──────────────┬──────────────┘         └───────────────┘
//!                    │ yes
//!                    ▼
//!     snapshot = Snapshot::from_probe(current)
//!                    │
//!                    ▼
//!     map_printers(current, registered, now) ──► RegisteredPrinter[]
//! ```
//!
//! ## Matching Rules
//! - Names compare after [`normalize_name`] (trimmed, lower-cased).
//! - A registered printer with no matching probed printer is `Offline`.
//! - Every registered printer yields exactly one output record.
//! - Only presence and `status` count as a change; `driver`, `port` and
//!   `isDefault` are ignored.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use crate::types::{PrinterStatus, ProbedPrinter, RegisteredPrinter};

/// Normalizes a printer name for matching.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

// =============================================================================
// Mapping
// =============================================================================

/// Reconciles probed printers onto registered printer records.
///
/// Pure and total: the output has one entry per registered printer, in the
/// same order, each stamped with `evaluated_at`.
///
/// ## Example
/// ```rust
/// use chrono::Utc;
/// use printdesk_core::{map_printers, PrinterStatus, RegisteredPrinter};
///
/// let registered = vec![
///     RegisteredPrinter::new("p1", "shop-1", "Canon MX"),
///     RegisteredPrinter::new("p2", "shop-1", "Epson L3150"),
/// ];
///
/// // OS probe failed: everything is offline.
/// let mapped = map_printers(&[], &registered, Utc::now());
/// assert_eq!(mapped.len(), 2);
/// assert!(mapped.iter().all(|p| p.status == PrinterStatus::Offline));
/// ```
pub fn map_printers(
    probed: &[ProbedPrinter],
    registered: &[RegisteredPrinter],
    evaluated_at: DateTime<Utc>,
) -> Vec<RegisteredPrinter> {
    // First occurrence wins when two OS printers differ only by case.
    let mut by_name: HashMap<String, PrinterStatus> = HashMap::with_capacity(probed.len());
    for printer in probed {
        by_name
            .entry(normalize_name(&printer.name))
            .or_insert(printer.status);
    }

    registered
        .iter()
        .map(|printer| {
            let status = by_name
                .get(&normalize_name(&printer.printer_name))
                .copied()
                .unwrap_or(PrinterStatus::Offline);
            printer.with_status(status, evaluated_at)
        })
        .collect()
}

/// Finds a probed printer by name, ignoring case.
pub fn find_printer<'a>(probed: &'a [ProbedPrinter], name: &str) -> Option<&'a ProbedPrinter> {
    let wanted = normalize_name(name);
    probed.iter().find(|p| normalize_name(&p.name) == wanted)
}

// =============================================================================
// Snapshot
// =============================================================================

/// The last probe a monitoring session acted on.
///
/// Keys are normalized names. `probed_count` remembers how many printers the
/// OS reported so that two printers whose names collapse to one key do not
/// register as a count change on every pass.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    entries: HashMap<String, ProbedPrinter>,
    probed_count: usize,
    primed: bool,
}

impl Snapshot {
    /// Creates an empty, unprimed snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a primed snapshot from a probe result.
    pub fn from_probe(probed: &[ProbedPrinter]) -> Self {
        let mut entries = HashMap::with_capacity(probed.len());
        for printer in probed {
            entries
                .entry(normalize_name(&printer.name))
                .or_insert_with(|| printer.clone());
        }

        Snapshot {
            entries,
            probed_count: probed.len(),
            primed: true,
        }
    }

    /// Whether a pass has populated this snapshot since it was last cleared.
    pub fn is_primed(&self) -> bool {
        self.primed
    }

    /// Number of distinct printers held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no printers are held.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up a printer by name, ignoring case.
    pub fn get(&self, name: &str) -> Option<&ProbedPrinter> {
        self.entries.get(&normalize_name(name))
    }

    /// Drops every entry and the primed flag.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.probed_count = 0;
        self.primed = false;
    }

    /// Structural diff of `current` against this snapshot.
    pub fn has_changed(&self, current: &[ProbedPrinter]) -> bool {
        if current.len() != self.probed_count {
            return true;
        }

        // Only the first printer per key is compared, as in `from_probe`.
        let mut seen = HashSet::with_capacity(current.len());
        current.iter().any(|printer| {
            let key = normalize_name(&printer.name);
            if !seen.insert(key.clone()) {
                return false;
            }

            match self.entries.get(&key) {
                None => true,
                Some(previous) => previous.status != printer.status,
            }
        })
    }
}

/// Free-function form of [`Snapshot::has_changed`].
pub fn has_changed(current: &[ProbedPrinter], previous: &Snapshot) -> bool {
    previous.has_changed(current)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
    }

    fn registered(id: &str, name: &str) -> RegisteredPrinter {
        RegisteredPrinter::new(id, "shop-1", name)
    }

    #[test]
    fn test_map_matches_and_stamps_heartbeat() {
        let probed = vec![ProbedPrinter::new("Canon MX", PrinterStatus::Online)];
        let regs = vec![registered("p1", "Canon MX")];

        let mapped = map_printers(&probed, &regs, now());
        assert_eq!(mapped.len(), 1);
        assert_eq!(mapped[0].id, "p1");
        assert_eq!(mapped[0].status, PrinterStatus::Online);
        assert_eq!(mapped[0].last_heartbeat, Some(now()));
    }

    #[test]
    fn test_map_is_case_insensitive() {
        let probed = vec![ProbedPrinter::new("hp laserjet", PrinterStatus::Error)];
        let regs = vec![registered("p1", "HP LaserJet")];

        let mapped = map_printers(&probed, &regs, now());
        assert_eq!(mapped[0].status, PrinterStatus::Error);
    }

    #[test]
    fn test_map_unmatched_is_offline() {
        let mut reg = registered("p1", "Brother HL");
        reg.status = PrinterStatus::Online;
        let probed = vec![ProbedPrinter::new("Canon MX", PrinterStatus::Online)];

        let mapped = map_printers(&probed, &[reg], now());
        assert_eq!(mapped[0].status, PrinterStatus::Offline);
        assert_eq!(mapped[0].last_heartbeat, Some(now()));
    }

    #[test]
    fn test_map_empty_probe_marks_everything_offline() {
        let regs = vec![
            registered("p1", "A"),
            registered("p2", "B"),
            registered("p3", "C"),
        ];

        let mapped = map_printers(&[], &regs, now());
        assert_eq!(mapped.len(), 3);
        assert!(mapped.iter().all(|p| p.status == PrinterStatus::Offline));
    }

    #[test]
    fn test_map_is_total_and_keeps_order() {
        let probed = vec![
            ProbedPrinter::new("B", PrinterStatus::Online),
            ProbedPrinter::new("Z", PrinterStatus::Error),
        ];
        let regs = vec![
            registered("p1", "A"),
            registered("p2", "B"),
            registered("p3", "B"),
            registered("p4", "Z"),
        ];

        let mapped = map_printers(&probed, &regs, now());
        let ids: Vec<_> = mapped.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2", "p3", "p4"]);

        let statuses: Vec<_> = mapped.iter().map(|p| p.status).collect();
        assert_eq!(
            statuses,
            vec![
                PrinterStatus::Offline,
                PrinterStatus::Online,
                PrinterStatus::Online,
                PrinterStatus::Error
            ]
        );
    }

    #[test]
    fn test_map_over_no_registered_printers() {
        let probed = vec![ProbedPrinter::new("Canon MX", PrinterStatus::Online)];
        assert!(map_printers(&probed, &[], now()).is_empty());
    }

    #[test]
    fn test_find_printer_ignores_case() {
        let probed = vec![
            ProbedPrinter::new("Canon MX", PrinterStatus::Online),
            ProbedPrinter::new("Epson", PrinterStatus::Offline),
        ];

        assert_eq!(
            find_printer(&probed, "canon mx").map(|p| p.status),
            Some(PrinterStatus::Online)
        );
        assert!(find_printer(&probed, "Brother").is_none());
    }

    #[test]
    fn test_new_snapshot_is_unprimed() {
        let snapshot = Snapshot::new();
        assert!(!snapshot.is_primed());
        assert!(snapshot.is_empty());
        assert!(!snapshot.has_changed(&[]));
    }

    #[test]
    fn test_identical_probe_is_unchanged() {
        let probe = vec![
            ProbedPrinter::new("Canon MX", PrinterStatus::Online),
            ProbedPrinter::new("Epson", PrinterStatus::Offline),
        ];
        let snapshot = Snapshot::from_probe(&probe);

        assert!(snapshot.is_primed());
        assert!(!has_changed(&probe, &snapshot));
    }

    #[test]
    fn test_status_flip_is_a_change() {
        let before = vec![ProbedPrinter::new("Canon MX", PrinterStatus::Online)];
        let after = vec![ProbedPrinter::new("Canon MX", PrinterStatus::Offline)];

        assert!(Snapshot::from_probe(&before).has_changed(&after));
    }

    #[test]
    fn test_added_removed_and_renamed_printers_are_changes() {
        let snapshot = Snapshot::from_probe(&[ProbedPrinter::new("A", PrinterStatus::Online)]);

        assert!(snapshot.has_changed(&[]));
        assert!(snapshot.has_changed(&[
            ProbedPrinter::new("A", PrinterStatus::Online),
            ProbedPrinter::new("B", PrinterStatus::Online),
        ]));
        assert!(snapshot.has_changed(&[ProbedPrinter::new("B", PrinterStatus::Online)]));
    }

    #[test]
    fn test_diagnostic_fields_are_ignored() {
        let before = vec![ProbedPrinter::new("A", PrinterStatus::Online).with_port("USB001")];
        let after = vec![ProbedPrinter::new("A", PrinterStatus::Online)
            .with_port("USB002")
            .with_driver("Generic")
            .as_default()];

        assert!(!Snapshot::from_probe(&before).has_changed(&after));
    }

    #[test]
    fn test_case_collisions_do_not_churn() {
        let probe = vec![
            ProbedPrinter::new("Office", PrinterStatus::Online),
            ProbedPrinter::new("OFFICE", PrinterStatus::Online),
        ];
        let snapshot = Snapshot::from_probe(&probe);

        assert_eq!(snapshot.len(), 1);
        assert!(!snapshot.has_changed(&probe));
    }

    #[test]
    fn test_case_collisions_with_different_status_do_not_churn() {
        let probe = vec![
            ProbedPrinter::new("HP LaserJet", PrinterStatus::Online),
            ProbedPrinter::new("hp laserjet", PrinterStatus::Offline),
        ];
        let snapshot = Snapshot::from_probe(&probe);

        assert!(!snapshot.has_changed(&probe));
        assert_eq!(snapshot.get("HP LASERJET").unwrap().status, PrinterStatus::Online);

        let flipped = vec![
            ProbedPrinter::new("HP LaserJet", PrinterStatus::Error),
            ProbedPrinter::new("hp laserjet", PrinterStatus::Offline),
        ];
        assert!(snapshot.has_changed(&flipped));
    }

    #[test]
    fn test_empty_probe_still_primes() {
        let snapshot = Snapshot::from_probe(&[]);
        assert!(snapshot.is_primed());
        assert!(!snapshot.has_changed(&[]));
    }

    #[test]
    fn test_clear_resets_priming() {
        let mut snapshot = Snapshot::from_probe(&[ProbedPrinter::new("A", PrinterStatus::Online)]);
        snapshot.clear();

        assert!(!snapshot.is_primed());
        assert!(snapshot.is_empty());
        assert!(snapshot.get("a").is_none());
    }
}
