//! # Printer Gateway
//!
//! The boundary the desktop shell exposes to the dashboard. Every operation
//! returns a structured response; nothing here returns `Err` or panics.
//!
//! ## Gateway Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          PrinterGateway                                 │
//! │                                                                         │
//! │  detect_system_printers ──► probe ──────────────────────► DetectResponse│
//! │  get_printer_status ──────► probe ──► find by name ─────► StatusResponse│
//! │                                                                         │
//! │  start_monitoring ──┐                                                   │
//! │  sync_printer_status┤                                                   │
//! │                     ▼                                                   │
//! │      validate ─► connect (cached) ─► attach token ─► fetch registered   │
//! │                                                                         │
//! │  start: MonitoringSession::start ─► updates channel                     │
//! │                                        │                                │
//! │                                        ▼                                │
//! │                         forwarder: persist_all ─► emit status-changed   │
//! │                                                                         │
//! │  sync:  probe ─► map ─► persist_all ─► return list (no push)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `start_monitoring` and `stop_monitoring` serialize on one lifecycle lock,
//! so two concurrent starts can never both pass the "already active" check.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use printdesk_core::validation::validate_shop_id;
use printdesk_core::{find_printer, map_printers, RegisteredPrinter, ValidationError};
use printdesk_store::{CachedConnector, PrinterRepository, StoreConnector};

use crate::config::MonitorConfig;
use crate::error::{MonitorError, MonitorResult};
use crate::events::{NoOpEmitter, PrinterEventEmitter};
use crate::probe::{PrinterProbe, SystemProber};
use crate::response::{
    DetectResponse, MonitorRequest, MonitoringStateResponse, StartMonitoringResponse,
    StatusResponse, StopResponse, SyncResponse,
};
use crate::session::{MonitoringSession, StartOutcome, StatusUpdates};

// =============================================================================
// Printer Gateway
// =============================================================================

/// Command gateway over the prober, the monitoring session and the store.
pub struct PrinterGateway {
    config: MonitorConfig,
    probe: Arc<dyn PrinterProbe>,
    session: MonitoringSession,
    connector: Arc<dyn StoreConnector>,
    emitter: Arc<dyn PrinterEventEmitter>,

    /// Held for the whole of start/stop.
    lifecycle: tokio::sync::Mutex<()>,

    /// Task persisting and pushing the running session's updates.
    forwarder: Mutex<Option<JoinHandle<()>>>,
}

impl PrinterGateway {
    /// Gateway with the default prober, REST connector and no-op emitter.
    pub fn new(config: MonitorConfig) -> MonitorResult<Self> {
        PrinterGatewayBuilder::new(config).build()
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    // =========================================================================
    // Read-only Operations
    // =========================================================================

    /// Lists the printers the OS reports right now. Never writes anywhere.
    pub async fn detect_system_printers(&self) -> DetectResponse {
        let printers = self.probe.probe().await;
        info!(count = printers.len(), "Detected system printers");
        DetectResponse::ok(printers)
    }

    /// Probes and returns the printer named `printer_name` (case-insensitive).
    ///
    /// Independent of any running session and its snapshot. A blank name
    /// matches nothing and skips the OS query.
    pub async fn get_printer_status(&self, printer_name: &str) -> StatusResponse {
        if printer_name.trim().is_empty() {
            return StatusResponse::ok(None);
        }

        let printers = self.probe.probe().await;
        let found = find_printer(&printers, printer_name).cloned();
        debug!(printer_name, found = found.is_some(), "Printer status looked up");
        StatusResponse::ok(found)
    }

    /// Whether a monitoring session is running.
    pub fn is_monitoring(&self) -> MonitoringStateResponse {
        MonitoringStateResponse {
            success: true,
            active: self.session.is_active(),
        }
    }

    // =========================================================================
    // Monitoring Lifecycle
    // =========================================================================

    /// Starts monitoring the shop's registered printers.
    ///
    /// Returns "Already monitoring" if any session is running, for any shop.
    pub async fn start_monitoring(&self, request: MonitorRequest) -> StartMonitoringResponse {
        self.try_start(request)
            .await
            .unwrap_or_else(|e| StartMonitoringResponse::failed(&e))
    }

    async fn try_start(&self, request: MonitorRequest) -> MonitorResult<StartMonitoringResponse> {
        let _lifecycle = self.lifecycle.lock().await;

        if self.session.is_active() {
            info!("Monitoring already active");
            return Ok(StartMonitoringResponse::already_monitoring());
        }

        let (shop_id, repo) = self.connect(&request).await?;
        let registered = repo.fetch_for_shop(&shop_id).await?;

        if registered.is_empty() {
            info!(%shop_id, "No printers registered for shop");
            return Ok(StartMonitoringResponse::no_printers());
        }

        match self
            .session
            .start(registered.clone(), self.config.poll_interval())
        {
            StartOutcome::Started { session_id, updates } => {
                let task = tokio::spawn(forward_updates(
                    session_id,
                    repo,
                    updates,
                    Arc::clone(&self.emitter),
                ));
                *self.lock_forwarder() = Some(task);

                info!(%session_id, %shop_id, printers = registered.len(), "Monitoring started");
                Ok(StartMonitoringResponse::started(registered))
            }
            StartOutcome::AlreadyRunning => Ok(StartMonitoringResponse::already_monitoring()),
        }
    }

    /// Stops monitoring. Always succeeds.
    pub async fn stop_monitoring(&self) -> StopResponse {
        let _lifecycle = self.lifecycle.lock().await;

        if !self.session.stop() {
            debug!("Stop requested while not monitoring");
        }
        StopResponse::ok()
    }

    /// Stops everything without waiting. For application exit.
    pub fn shutdown(&self) {
        self.session.stop();
        if let Some(task) = self.lock_forwarder().take() {
            task.abort();
        }
        info!("Printer gateway shut down");
    }

    // =========================================================================
    // One-shot Sync
    // =========================================================================

    /// Probes, maps, persists and returns the shop's printers once.
    ///
    /// Leaves any running session alone and pushes nothing to the UI.
    pub async fn sync_printer_status(&self, request: MonitorRequest) -> SyncResponse {
        match self.try_sync(request).await {
            Ok(printers) => SyncResponse::ok(printers),
            Err(e) => SyncResponse::failed(&e),
        }
    }

    async fn try_sync(&self, request: MonitorRequest) -> MonitorResult<Vec<RegisteredPrinter>> {
        let (shop_id, repo) = self.connect(&request).await?;
        let registered = repo.fetch_for_shop(&shop_id).await?;

        if registered.is_empty() {
            return Ok(Vec::new());
        }

        let probed = self.probe.probe().await;
        let mapped = map_printers(&probed, &registered, Utc::now());
        let report = repo.persist_all(&mapped).await;

        info!(
            %shop_id,
            updated = report.updated,
            failed = report.failed.len(),
            "Printer status synced"
        );
        Ok(mapped)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Validates the request and returns an authorized repository for it.
    async fn connect(&self, request: &MonitorRequest) -> MonitorResult<(String, PrinterRepository)> {
        let shop_id = validate_shop_id(&request.shop_id)?;

        let token = non_blank(&request.access_token).ok_or_else(|| {
            MonitorError::Credentials("Not authenticated: access token is required".into())
        })?;

        let url = non_blank(&request.store_url)
            .or_else(|| non_blank(&self.config.store.url))
            .ok_or_else(|| required("storeUrl"))?;
        let key = non_blank(&request.store_key)
            .or_else(|| non_blank(&self.config.store.anon_key))
            .ok_or_else(|| required("storeKey"))?;

        let store = self.connector.connect(url, key)?;
        store.attach_session(token).await?;

        let repo = PrinterRepository::new(store, &self.config.store.printers_table);
        Ok((shop_id, repo))
    }

    fn lock_forwarder(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.forwarder
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn required(field: &str) -> MonitorError {
    ValidationError::Required {
        field: field.to_string(),
    }
    .into()
}

/// Persists each batch, then pushes it. Ends when the session stops.
async fn forward_updates(
    session_id: Uuid,
    repo: PrinterRepository,
    mut updates: StatusUpdates,
    emitter: Arc<dyn PrinterEventEmitter>,
) {
    while let Some(printers) = updates.recv().await {
        if updates.is_closed() {
            debug!(%session_id, "Dropping status update queued before stop");
            break;
        }

        let report = repo.persist_all(&printers).await;
        if !report.is_complete() {
            warn!(
                %session_id,
                failed = report.failed.len(),
                "Some printer status writes failed"
            );
        }

        if updates.is_closed() {
            debug!(%session_id, "Session stopped while persisting, skipping push");
            break;
        }

        emitter.emit_status_changed(&printers);
    }

    debug!(%session_id, "Status forwarding finished");
}

// =============================================================================
// Builder Pattern
// =============================================================================

/// Builder for [`PrinterGateway`].
pub struct PrinterGatewayBuilder {
    config: MonitorConfig,
    probe: Option<Arc<dyn PrinterProbe>>,
    connector: Option<Arc<dyn StoreConnector>>,
    emitter: Option<Arc<dyn PrinterEventEmitter>>,
}

impl PrinterGatewayBuilder {
    pub fn new(config: MonitorConfig) -> Self {
        PrinterGatewayBuilder {
            config,
            probe: None,
            connector: None,
            emitter: None,
        }
    }

    /// Sets the printer probe.
    pub fn with_probe(mut self, probe: Arc<dyn PrinterProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    /// Sets the record store connector.
    pub fn with_connector(mut self, connector: Arc<dyn StoreConnector>) -> Self {
        self.connector = Some(connector);
        self
    }

    /// Sets the event emitter.
    pub fn with_emitter(mut self, emitter: Arc<dyn PrinterEventEmitter>) -> Self {
        self.emitter = Some(emitter);
        self
    }

    /// Validates the config and builds the gateway.
    pub fn build(self) -> MonitorResult<PrinterGateway> {
        self.config.validate()?;

        let probe = self
            .probe
            .unwrap_or_else(|| Arc::new(SystemProber::new(self.config.probe_timeout())));
        let connector = self
            .connector
            .unwrap_or_else(|| Arc::new(CachedConnector::rest(self.config.request_timeout())));
        let emitter = self.emitter.unwrap_or_else(|| Arc::new(NoOpEmitter));

        Ok(PrinterGateway {
            session: MonitoringSession::new(Arc::clone(&probe)),
            config: self.config,
            probe,
            connector,
            emitter,
            lifecycle: tokio::sync::Mutex::new(()),
            forwarder: Mutex::new(None),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ChannelEmitter;
    use crate::probe::StaticProbe;
    use crate::response::ErrorCode;
    use printdesk_core::{PrinterStatus, ProbedPrinter};
    use async_trait::async_trait;
    use printdesk_store::{Filter, MemoryStore, RecordStore, StoreResult};
    use serde_json::{json, Value};
    use tokio::sync::Notify;

    const TABLE: &str = "shop_printers";

    struct Harness {
        gateway: PrinterGateway,
        store: Arc<MemoryStore>,
        probe: Arc<StaticProbe>,
        emitter: Arc<ChannelEmitter>,
    }

    fn config() -> MonitorConfig {
        let mut config = MonitorConfig::default();
        config.store.url = Some("https://test.supabase.co".into());
        config.store.anon_key = Some("anon".into());
        config
    }

    fn harness() -> Harness {
        let store = Arc::new(MemoryStore::new());
        store.insert(
            TABLE,
            json!({ "id": "p1", "shop_id": "shop-1", "printer_name": "Canon MX",
                    "printer_type": "laser", "status": "offline", "created_at": "2024-01-01" }),
        );
        store.insert(
            TABLE,
            json!({ "id": "p2", "shop_id": "shop-1", "printer_name": "Epson",
                    "status": "online", "created_at": "2024-01-02" }),
        );
        store.insert(
            TABLE,
            json!({ "id": "p3", "shop_id": "shop-2", "printer_name": "Zebra" }),
        );

        let probe = Arc::new(StaticProbe::new(vec![
            ProbedPrinter::new("CANON MX", PrinterStatus::Online).as_default(),
            ProbedPrinter::new("Brother", PrinterStatus::Error),
        ]));
        let emitter = Arc::new(ChannelEmitter::default());

        let gateway = PrinterGatewayBuilder::new(config())
            .with_probe(probe.clone())
            .with_connector(Arc::new(CachedConnector::fixed(store.clone())))
            .with_emitter(emitter.clone())
            .build()
            .unwrap();

        Harness {
            gateway,
            store,
            probe,
            emitter,
        }
    }

    fn request(shop_id: &str) -> MonitorRequest {
        MonitorRequest::new(shop_id, "access-token")
    }

    #[tokio::test]
    async fn test_detect_system_printers() {
        let h = harness();
        let res = h.gateway.detect_system_printers().await;

        assert!(res.success);
        assert_eq!(res.printers.unwrap().len(), 2);
        assert_eq!(h.store.update_count(), 0);
    }

    #[tokio::test]
    async fn test_get_printer_status() {
        let h = harness();

        let res = h.gateway.get_printer_status("canon mx").await;
        assert!(res.success);
        assert_eq!(res.status.unwrap().status, PrinterStatus::Online);

        let res = h.gateway.get_printer_status("Nope").await;
        assert!(res.success);
        assert!(res.status.is_none());

        // Blank names match nothing and don't reach the OS.
        let res = h.gateway.get_printer_status("  ").await;
        assert!(res.success);
        assert!(res.status.is_none());
        assert_eq!(h.probe.calls(), 2);
    }

    #[tokio::test]
    async fn test_start_monitoring_persists_then_pushes() {
        let h = harness();
        let mut sub = h.emitter.subscribe();

        let res = h.gateway.start_monitoring(request("shop-1")).await;
        assert!(res.success);
        assert_eq!(res.message.as_deref(), Some("Monitoring started"));
        assert_eq!(res.printers.unwrap().len(), 2);
        assert!(h.gateway.is_monitoring().active);

        let pushed = sub.recv().await.unwrap();
        assert_eq!(pushed.len(), 2);
        assert_eq!(pushed[0].id, "p1");
        assert_eq!(pushed[0].status, PrinterStatus::Online);
        assert_eq!(pushed[0].printer_type, "laser");
        assert_eq!(pushed[1].status, PrinterStatus::Offline);

        let row = h.store.row(TABLE, "p1").unwrap();
        assert_eq!(row["status"], "online");
        assert!(row["last_heartbeat"].is_string());
        assert_eq!(h.store.row(TABLE, "p2").unwrap()["status"], "offline");
        assert_eq!(h.store.row(TABLE, "p3").unwrap().get("status"), None);
        assert_eq!(h.store.session().as_deref(), Some("access-token"));

        h.gateway.stop_monitoring().await;
    }

    #[tokio::test]
    async fn test_monitoring_write_failure_still_pushes_full_list() {
        let h = harness();
        let mut sub = h.emitter.subscribe();
        h.store.fail_updates_for("p1");

        assert!(h.gateway.start_monitoring(request("shop-1")).await.success);

        let pushed = sub.recv().await.unwrap();
        assert_eq!(pushed.len(), 2);
        assert_eq!(pushed[0].status, PrinterStatus::Online);

        let p1 = h.store.row(TABLE, "p1").unwrap();
        assert_eq!(p1["status"], "offline");
        assert_eq!(p1.get("last_heartbeat"), None);
        let p2 = h.store.row(TABLE, "p2").unwrap();
        assert_eq!(p2["status"], "offline");
        assert!(p2["last_heartbeat"].is_string());

        h.gateway.stop_monitoring().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_change_persists_and_pushes_again() {
        let h = harness();
        let mut sub = h.emitter.subscribe();

        h.gateway.start_monitoring(request("shop-1")).await;
        let first = sub.recv().await.unwrap();
        assert_eq!(first[0].status, PrinterStatus::Online);
        assert_eq!(h.store.row(TABLE, "p1").unwrap()["status"], "online");

        h.probe.set(vec![ProbedPrinter::new("Canon MX", PrinterStatus::Error)]);

        let second = sub.recv().await.unwrap();
        assert_eq!(second.len(), 2);
        assert_eq!(second[0].status, PrinterStatus::Error);
        assert_eq!(second[1].status, PrinterStatus::Offline);
        assert_eq!(h.store.row(TABLE, "p1").unwrap()["status"], "error");

        h.gateway.stop_monitoring().await;
    }

    #[tokio::test]
    async fn test_concurrent_starts_create_one_session() {
        let h = harness();

        let (a, b) = tokio::join!(
            h.gateway.start_monitoring(request("shop-1")),
            h.gateway.start_monitoring(request("shop-1")),
        );
        let mut messages = vec![a.message.unwrap(), b.message.unwrap()];
        messages.sort();
        assert_eq!(messages, vec!["Already monitoring", "Monitoring started"]);

        // A different shop doesn't get its own session either.
        let c = h.gateway.start_monitoring(request("shop-2")).await;
        assert_eq!(c.message.as_deref(), Some("Already monitoring"));
        assert!(c.printers.is_none());

        h.gateway.stop_monitoring().await;
    }

    #[tokio::test]
    async fn test_no_registered_printers() {
        let h = harness();

        let res = h.gateway.start_monitoring(request("shop-empty")).await;
        assert!(res.success);
        assert_eq!(res.message.as_deref(), Some("No printers registered yet"));
        assert_eq!(res.printers, Some(Vec::new()));
        assert!(!h.gateway.is_monitoring().active);
        assert_eq!(h.probe.calls(), 0);
    }

    #[tokio::test]
    async fn test_credential_failures() {
        let h = harness();
        h.store.accept_token("access-token");

        let mut missing = request("shop-1");
        missing.access_token = None;
        let res = h.gateway.start_monitoring(missing).await;
        assert!(!res.success);
        assert_eq!(res.error_code, Some(ErrorCode::Credentials));

        let res = h
            .gateway
            .sync_printer_status(MonitorRequest::new("shop-1", "stolen"))
            .await;
        assert_eq!(res.error_code, Some(ErrorCode::Credentials));
        assert!(!h.gateway.is_monitoring().active);
    }

    #[tokio::test]
    async fn test_credential_failure_leaves_running_session() {
        let h = harness();
        h.store.accept_token("access-token");
        h.gateway.start_monitoring(request("shop-1")).await;

        let res = h
            .gateway
            .sync_printer_status(MonitorRequest::new("shop-1", "expired"))
            .await;
        assert!(!res.success);
        assert!(h.gateway.is_monitoring().active);

        h.gateway.stop_monitoring().await;
    }

    #[tokio::test]
    async fn test_store_query_failure() {
        let h = harness();
        h.store.fail_queries_on(TABLE);

        let res = h.gateway.start_monitoring(request("shop-1")).await;
        assert!(!res.success);
        assert_eq!(res.error_code, Some(ErrorCode::StoreQuery));
        assert!(res.error.unwrap().contains("injected failure"));
        assert!(!h.gateway.is_monitoring().active);
    }

    #[tokio::test]
    async fn test_store_parameters_fall_back_to_config() {
        let store = Arc::new(MemoryStore::new());
        let seen = Arc::new(Mutex::new(Vec::<String>::new()));
        let connector = {
            let seen = Arc::clone(&seen);
            let store = Arc::clone(&store);
            CachedConnector::with_factory(move |url, key| {
                seen.lock().unwrap().push(format!("{url} {key}"));
                let store: Arc<dyn printdesk_store::RecordStore> = store.clone();
                Ok(store)
            })
        };
        let gateway = PrinterGatewayBuilder::new(config())
            .with_probe(Arc::new(StaticProbe::default()))
            .with_connector(Arc::new(connector))
            .build()
            .unwrap();

        gateway.sync_printer_status(request("shop-1")).await;
        gateway
            .sync_printer_status(request("shop-1").with_store("https://other.supabase.co", "k2"))
            .await;

        assert_eq!(
            *seen.lock().unwrap(),
            vec!["https://test.supabase.co anon", "https://other.supabase.co k2"]
        );
    }

    #[tokio::test]
    async fn test_missing_store_parameters() {
        let gateway = PrinterGatewayBuilder::new(MonitorConfig::default())
            .with_probe(Arc::new(StaticProbe::default()))
            .build()
            .unwrap();

        let res = gateway.sync_printer_status(request("shop-1")).await;
        assert!(!res.success);
        assert_eq!(res.error_code, Some(ErrorCode::Validation));
        assert!(res.error.unwrap().contains("storeUrl"));

        let res = gateway.start_monitoring(MonitorRequest::new("", "t")).await;
        assert_eq!(res.error_code, Some(ErrorCode::Validation));
    }

    #[tokio::test]
    async fn test_stop_is_idempotent() {
        let h = harness();
        assert!(h.gateway.stop_monitoring().await.success);

        h.gateway.start_monitoring(request("shop-1")).await;
        assert!(h.gateway.stop_monitoring().await.success);
        assert!(!h.gateway.is_monitoring().active);
        assert!(h.gateway.stop_monitoring().await.success);
    }

    #[tokio::test]
    async fn test_sync_persists_without_session_or_push() {
        let h = harness();
        let mut sub = h.emitter.subscribe();
        h.store.fail_updates_for("p1");

        let res = h.gateway.sync_printer_status(request("shop-1")).await;
        assert!(res.success);

        let printers = res.printers.unwrap();
        assert_eq!(printers.len(), 2);
        assert_eq!(printers[0].status, PrinterStatus::Online);
        assert!(printers.iter().all(|p| p.last_heartbeat.is_some()));

        // p1's write failed, p2's still went through.
        assert_eq!(h.store.row(TABLE, "p1").unwrap()["status"], "offline");
        assert_eq!(h.store.row(TABLE, "p2").unwrap()["status"], "offline");
        assert!(h.store.row(TABLE, "p2").unwrap()["last_heartbeat"].is_string());

        assert!(!h.gateway.is_monitoring().active);
        assert!(sub.try_recv().is_none());
    }

    /// Store whose updates wait until the test releases them.
    struct GatedStore {
        inner: MemoryStore,
        entered: Notify,
        release: Notify,
    }

    #[async_trait]
    impl RecordStore for GatedStore {
        async fn attach_session(&self, access_token: &str) -> StoreResult<()> {
            self.inner.attach_session(access_token).await
        }

        async fn query(&self, table: &str, filter: &Filter) -> StoreResult<Vec<Value>> {
            self.inner.query(table, filter).await
        }

        async fn update(&self, table: &str, id: &str, fields: Value) -> StoreResult<()> {
            self.entered.notify_one();
            self.release.notified().await;
            self.inner.update(table, id, fields).await
        }
    }

    #[tokio::test]
    async fn test_stop_during_write_suppresses_push() {
        let store = Arc::new(GatedStore {
            inner: MemoryStore::new(),
            entered: Notify::new(),
            release: Notify::new(),
        });
        store.inner.insert(
            TABLE,
            json!({ "id": "p1", "shop_id": "shop-1", "printer_name": "Canon MX" }),
        );
        let repo = PrinterRepository::new(store.clone(), TABLE);
        let printers = map_printers(
            &[ProbedPrinter::new("Canon MX", PrinterStatus::Online)],
            &repo.fetch_for_shop("shop-1").await.unwrap(),
            Utc::now(),
        );

        let emitter = Arc::new(ChannelEmitter::default());
        let mut sub = emitter.subscribe();
        let (sink, updates) = tokio::sync::mpsc::unbounded_channel();
        sink.send(printers).unwrap();

        let forwarder = tokio::spawn(forward_updates(
            Uuid::new_v4(),
            repo,
            updates,
            emitter.clone(),
        ));

        // Stop lands while the write is in flight.
        store.entered.notified().await;
        drop(sink);
        store.release.notify_one();
        forwarder.await.unwrap();

        assert_eq!(store.inner.row(TABLE, "p1").unwrap()["status"], "online");
        assert!(sub.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_shutdown_stops_monitoring() {
        let h = harness();
        h.gateway.start_monitoring(request("shop-1")).await;

        h.gateway.shutdown();
        assert!(!h.gateway.is_monitoring().active);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = MonitorConfig::default();
        config.monitor.poll_interval_ms = 10;
        assert!(PrinterGateway::new(config).is_err());
    }
}
