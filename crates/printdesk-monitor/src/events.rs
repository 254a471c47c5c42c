//! # Status Events
//!
//! Push channel from the monitor to the dashboard.
//!
//! ```text
//! "printer:status-changed" - RegisteredPrinter[] (zero or more times per session)
//! ```
//!
//! The desktop shell implements [`PrinterEventEmitter`] on top of Tauri's
//! event system; the frontend unsubscribes with the `unlisten` function Tauri
//! hands back. [`ChannelEmitter`] offers the same subscribe/unsubscribe shape
//! in-process.

use tokio::sync::broadcast;
use tracing::{debug, warn};

use printdesk_core::RegisteredPrinter;

/// Event name used for status pushes.
pub const STATUS_CHANGED_EVENT: &str = "printer:status-changed";

// =============================================================================
// Event Emitter Trait
// =============================================================================

/// Trait for pushing printer status to the UI (implemented by the Tauri shell).
pub trait PrinterEventEmitter: Send + Sync {
    /// Delivers the full mapped printer list after a change.
    fn emit_status_changed(&self, printers: &[RegisteredPrinter]);
}

/// No-op event emitter.
pub struct NoOpEmitter;

impl PrinterEventEmitter for NoOpEmitter {
    fn emit_status_changed(&self, _printers: &[RegisteredPrinter]) {}
}

// =============================================================================
// Channel Emitter
// =============================================================================

/// Emitter fanning status pushes out to in-process subscribers.
#[derive(Debug, Clone)]
pub struct ChannelEmitter {
    tx: broadcast::Sender<Vec<RegisteredPrinter>>,
}

impl ChannelEmitter {
    /// Creates an emitter buffering up to `capacity` pushes per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        ChannelEmitter { tx }
    }

    /// Adds a subscriber. Only pushes emitted after this call are seen.
    pub fn subscribe(&self) -> StatusSubscription {
        StatusSubscription {
            rx: self.tx.subscribe(),
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ChannelEmitter {
    fn default() -> Self {
        Self::new(16)
    }
}

impl PrinterEventEmitter for ChannelEmitter {
    fn emit_status_changed(&self, printers: &[RegisteredPrinter]) {
        // Err only means nobody is listening.
        if self.tx.send(printers.to_vec()).is_err() {
            debug!("Status change emitted with no subscribers");
        }
    }
}

/// A subscription to status pushes.
#[derive(Debug)]
pub struct StatusSubscription {
    rx: broadcast::Receiver<Vec<RegisteredPrinter>>,
}

impl StatusSubscription {
    /// Waits for the next push. `None` once the emitter is gone.
    ///
    /// A subscriber that fell behind skips to the oldest push still buffered.
    pub async fn recv(&mut self) -> Option<Vec<RegisteredPrinter>> {
        loop {
            match self.rx.recv().await {
                Ok(printers) => return Some(printers),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Status subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Returns a push if one is ready.
    pub fn try_recv(&mut self) -> Option<Vec<RegisteredPrinter>> {
        loop {
            match self.rx.try_recv() {
                Ok(printers) => return Some(printers),
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => return None,
            }
        }
    }

    /// Ends the subscription.
    pub fn unsubscribe(self) {}
}
