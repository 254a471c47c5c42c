//! # Monitoring Session
//!
//! Owns the polling lifecycle: a cancellable background task, the snapshot
//! used for change detection, and the channel that carries mapped printers
//! to whoever started the session.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Stopped ──start()──► Running ──stop()──► Stopped                      │
//! │      ▲                    │  ▲                                          │
//! │      │                start() = AlreadyRunning (no reset)               │
//! │      │                                                                  │
//! │  stop() on Stopped is a no-op                                           │
//! │                                                                         │
//! │  Running: tick at 0, T, 2T, ...                                         │
//! │                                                                         │
//! │    pass ─► probe ─► [session still current?] ─► snapshot primed         │
//! │                          │ no: discard           and unchanged?         │
//! │                          ▼                        │ yes: nothing        │
//! │                       (dropped)                   ▼ no                  │
//! │                                      replace snapshot ─► map ─► send    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Passes never overlap: timer passes and on-demand [`MonitoringSession::tick`]
//! calls share one pass lock. `stop()` is synchronous: it aborts the task,
//! drops the sender (closing the receiver) and clears the snapshot under the
//! same lock a finishing pass must take, so a probe that completes after
//! `stop()` is discarded.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};
use uuid::Uuid;

use printdesk_core::{map_printers, RegisteredPrinter, Snapshot};

use crate::probe::PrinterProbe;

/// Receiving end of a session's mapped printer lists.
pub type StatusUpdates = mpsc::UnboundedReceiver<Vec<RegisteredPrinter>>;

/// Result of [`MonitoringSession::start`].
#[derive(Debug)]
pub enum StartOutcome {
    /// A new session is running; mapped printers arrive on `updates`.
    Started {
        session_id: Uuid,
        updates: StatusUpdates,
    },
    /// A session was already running and was left untouched.
    AlreadyRunning,
}

/// Result of one reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    /// State changed; this many mapped printers were sent.
    Changed(usize),
    /// Probe matched the snapshot; nothing sent.
    Unchanged,
    /// The session stopped (or was replaced) before the pass finished.
    Discarded,
}

// =============================================================================
// Shared State
// =============================================================================

struct ActiveRun {
    id: Uuid,
    registered: Arc<Vec<RegisteredPrinter>>,
    sink: mpsc::UnboundedSender<Vec<RegisteredPrinter>>,
    task: JoinHandle<()>,
}

#[derive(Default)]
struct SessionState {
    run: Option<ActiveRun>,
    snapshot: Snapshot,
}

struct Shared {
    probe: Arc<dyn PrinterProbe>,
    state: Mutex<SessionState>,
    pass_lock: tokio::sync::Mutex<()>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn is_current(&self, id: Uuid) -> bool {
        self.lock().run.as_ref().is_some_and(|run| run.id == id)
    }
}

// =============================================================================
// Monitoring Session
// =============================================================================

/// Polling session. At most one runs per instance.
pub struct MonitoringSession {
    shared: Arc<Shared>,
}

impl MonitoringSession {
    /// Creates a stopped session probing through `probe`.
    pub fn new(probe: Arc<dyn PrinterProbe>) -> Self {
        MonitoringSession {
            shared: Arc::new(Shared {
                probe,
                state: Mutex::new(SessionState::default()),
                pass_lock: tokio::sync::Mutex::new(()),
            }),
        }
    }

    /// Starts polling `registered` every `interval`.
    ///
    /// The first pass runs immediately. Must be called inside a Tokio runtime.
    pub fn start(&self, registered: Vec<RegisteredPrinter>, interval: Duration) -> StartOutcome {
        let mut state = self.shared.lock();

        if let Some(run) = &state.run {
            debug!(session_id = %run.id, "Monitoring session already running");
            return StartOutcome::AlreadyRunning;
        }

        let id = Uuid::new_v4();
        let (sink, updates) = mpsc::unbounded_channel();
        let printers = registered.len();

        state.snapshot.clear();
        let task = tokio::spawn(Self::run(Arc::clone(&self.shared), id, interval));
        state.run = Some(ActiveRun {
            id,
            registered: Arc::new(registered),
            sink,
            task,
        });

        info!(
            session_id = %id,
            printers,
            interval_ms = interval.as_millis() as u64,
            "Monitoring session started"
        );

        StartOutcome::Started {
            session_id: id,
            updates,
        }
    }

    /// Stops the session. Returns false if it was not running.
    pub fn stop(&self) -> bool {
        let mut state = self.shared.lock();
        state.snapshot.clear();

        match state.run.take() {
            Some(run) => {
                run.task.abort();
                info!(session_id = %run.id, "Monitoring session stopped");
                true
            }
            None => false,
        }
    }

    /// Runs one pass now, outside the timer. Waits for any pass in flight.
    pub async fn tick(&self) -> PassOutcome {
        match self.session_id() {
            Some(id) => Self::pass(&self.shared, id).await,
            None => PassOutcome::Discarded,
        }
    }

    pub fn is_active(&self) -> bool {
        self.shared.lock().run.is_some()
    }

    pub fn session_id(&self) -> Option<Uuid> {
        self.shared.lock().run.as_ref().map(|run| run.id)
    }

    /// Whether a pass has filled the snapshot since the last start.
    pub fn is_primed(&self) -> bool {
        self.shared.lock().snapshot.is_primed()
    }

    /// Number of distinct printers in the snapshot.
    pub fn snapshot_len(&self) -> usize {
        self.shared.lock().snapshot.len()
    }

    // =========================================================================
    // Pass Loop
    // =========================================================================

    async fn run(shared: Arc<Shared>, id: Uuid, period: Duration) {
        let mut ticker = tokio::time::interval(period.max(Duration::from_millis(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if Self::pass(&shared, id).await == PassOutcome::Discarded {
                break;
            }
        }

        debug!(session_id = %id, "Monitoring loop exited");
    }

    async fn pass(shared: &Shared, id: Uuid) -> PassOutcome {
        let _pass = shared.pass_lock.lock().await;
        if !shared.is_current(id) {
            return PassOutcome::Discarded;
        }

        let current = shared.probe.probe().await;

        let mut state = shared.lock();
        let SessionState { run, snapshot } = &mut *state;

        let Some(run) = run.as_ref().filter(|run| run.id == id) else {
            debug!(session_id = %id, "Discarding pass that finished after stop");
            return PassOutcome::Discarded;
        };

        if snapshot.is_primed() && !snapshot.has_changed(&current) {
            debug!(session_id = %id, probed = current.len(), "Printer state unchanged");
            return PassOutcome::Unchanged;
        }

        *snapshot = Snapshot::from_probe(&current);
        let mapped = map_printers(&current, &run.registered, Utc::now());
        let count = mapped.len();

        info!(session_id = %id, probed = current.len(), count, "Printer state changed");
        if run.sink.send(mapped).is_err() {
            warn!(session_id = %id, "Status receiver dropped");
        }

        PassOutcome::Changed(count)
    }
}

impl Drop for MonitoringSession {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::StaticProbe;
    use async_trait::async_trait;
    use printdesk_core::{PrinterStatus, ProbedPrinter};
    use tokio::sync::Semaphore;

    const INTERVAL: Duration = Duration::from_secs(10);

    fn registered() -> Vec<RegisteredPrinter> {
        vec![
            RegisteredPrinter::new("p1", "shop-1", "Canon MX"),
            RegisteredPrinter::new("p2", "shop-1", "Epson"),
        ]
    }

    fn canon(status: PrinterStatus) -> Vec<ProbedPrinter> {
        vec![ProbedPrinter::new("canon mx", status)]
    }

    fn updates(outcome: StartOutcome) -> StatusUpdates {
        match outcome {
            StartOutcome::Started { updates, .. } => updates,
            StartOutcome::AlreadyRunning => panic!("expected a new session"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_pass_runs_immediately() {
        let probe = Arc::new(StaticProbe::new(canon(PrinterStatus::Online)));
        let session = MonitoringSession::new(probe.clone());

        let mut rx = updates(session.start(registered(), INTERVAL));
        let batch = rx.recv().await.unwrap();

        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].status, PrinterStatus::Online);
        assert_eq!(batch[1].status, PrinterStatus::Offline);
        assert!(batch.iter().all(|p| p.last_heartbeat.is_some()));
        assert_eq!(probe.calls(), 1);
        assert!(session.is_primed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unchanged_passes_send_nothing() {
        let probe = Arc::new(StaticProbe::new(canon(PrinterStatus::Online)));
        let session = MonitoringSession::new(probe.clone());

        let mut rx = updates(session.start(registered(), INTERVAL));
        rx.recv().await.unwrap();

        // Ticks at 10 s and 20 s see the same state.
        let waited = tokio::time::timeout(Duration::from_secs(25), rx.recv()).await;
        assert!(waited.is_err());
        assert_eq!(probe.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_change_is_sent() {
        let probe = Arc::new(StaticProbe::new(canon(PrinterStatus::Online)));
        let session = MonitoringSession::new(probe.clone());

        let mut rx = updates(session.start(registered(), INTERVAL));
        rx.recv().await.unwrap();

        probe.set(canon(PrinterStatus::Error));
        let batch = rx.recv().await.unwrap();
        assert_eq!(batch[0].status, PrinterStatus::Error);
        assert_eq!(probe.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_probe_still_primes() {
        let probe = Arc::new(StaticProbe::new(Vec::new()));
        let session = MonitoringSession::new(probe.clone());

        let mut rx = updates(session.start(registered(), INTERVAL));
        let batch = rx.recv().await.unwrap();
        assert!(batch.iter().all(|p| p.status == PrinterStatus::Offline));

        // An OS that keeps reporting nothing doesn't cause a send every tick.
        let waited = tokio::time::timeout(Duration::from_secs(15), rx.recv()).await;
        assert!(waited.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_start_is_a_no_op() {
        let probe = Arc::new(StaticProbe::new(canon(PrinterStatus::Online)));
        let session = MonitoringSession::new(probe.clone());

        let first = session.start(registered(), INTERVAL);
        let id = session.session_id();
        let mut rx = updates(first);
        rx.recv().await.unwrap();

        assert!(matches!(
            session.start(registered(), Duration::from_secs(1)),
            StartOutcome::AlreadyRunning
        ));
        assert_eq!(session.session_id(), id);
        assert!(session.is_primed());

        let waited = tokio::time::timeout(Duration::from_secs(5), rx.recv()).await;
        assert!(waited.is_err());
        assert_eq!(probe.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_clears_state_and_cancels_timer() {
        let probe = Arc::new(StaticProbe::new(canon(PrinterStatus::Online)));
        let session = MonitoringSession::new(probe.clone());

        let mut rx = updates(session.start(registered(), INTERVAL));
        rx.recv().await.unwrap();

        assert!(session.stop());
        assert!(!session.is_active());
        assert!(!session.is_primed());
        assert_eq!(session.snapshot_len(), 0);
        assert!(rx.recv().await.is_none());

        tokio::time::sleep(INTERVAL * 3).await;
        assert_eq!(probe.calls(), 1);

        assert!(!session.stop());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_sends_immediately() {
        let probe = Arc::new(StaticProbe::new(canon(PrinterStatus::Online)));
        let session = MonitoringSession::new(probe.clone());

        let mut rx = updates(session.start(registered(), INTERVAL));
        rx.recv().await.unwrap();
        session.stop();

        // Same printer state as before, but the snapshot was cleared.
        let mut rx = updates(session.start(registered(), INTERVAL));
        assert_eq!(rx.recv().await.unwrap()[0].status, PrinterStatus::Online);
    }

    #[tokio::test(start_paused = true)]
    async fn test_on_demand_tick() {
        let probe = Arc::new(StaticProbe::new(canon(PrinterStatus::Online)));
        let session = MonitoringSession::new(probe.clone());
        assert_eq!(session.tick().await, PassOutcome::Discarded);

        let mut rx = updates(session.start(registered(), INTERVAL));
        rx.recv().await.unwrap();

        assert_eq!(session.tick().await, PassOutcome::Unchanged);

        probe.set(canon(PrinterStatus::Offline));
        assert_eq!(session.tick().await, PassOutcome::Changed(2));
        assert_eq!(rx.recv().await.unwrap()[0].status, PrinterStatus::Offline);
    }

    /// Probe that blocks until a permit is released.
    struct GatedProbe {
        gate: Semaphore,
        inner: StaticProbe,
    }

    #[async_trait]
    impl PrinterProbe for GatedProbe {
        async fn probe(&self) -> Vec<ProbedPrinter> {
            let _permit = self.gate.acquire().await;
            self.inner.probe().await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_pass_waiting_on_stopped_session_is_discarded() {
        let probe = Arc::new(GatedProbe {
            gate: Semaphore::new(0),
            inner: StaticProbe::new(canon(PrinterStatus::Online)),
        });
        let session = Arc::new(MonitoringSession::new(probe.clone()));

        let mut rx = updates(session.start(registered(), INTERVAL));

        // Timer pass is blocked in the probe; an on-demand pass queues behind it.
        let queued = tokio::spawn({
            let session = Arc::clone(&session);
            async move { session.tick().await }
        });
        for _ in 0..3 {
            tokio::task::yield_now().await;
        }

        session.stop();
        probe.gate.add_permits(10);

        assert_eq!(queued.await.unwrap(), PassOutcome::Discarded);
        assert!(rx.recv().await.is_none());
        assert_eq!(probe.inner.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_polling() {
        let probe = Arc::new(StaticProbe::new(canon(PrinterStatus::Online)));
        let session = MonitoringSession::new(probe.clone());

        let mut rx = updates(session.start(registered(), INTERVAL));
        rx.recv().await.unwrap();
        drop(session);

        assert!(rx.recv().await.is_none());
        tokio::time::sleep(INTERVAL * 2).await;
        assert_eq!(probe.calls(), 1);
    }
}
