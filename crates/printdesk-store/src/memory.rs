//! # In-Memory Record Store
//!
//! A `RecordStore` backed by a `HashMap`, for tests and offline demos.
//!
//! Failures can be injected per table (queries) and per row id (updates), and
//! an accepted-token list turns on credential checking.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::record::{Filter, RecordStore};

#[derive(Debug, Default)]
struct Inner {
    tables: HashMap<String, Vec<Value>>,
    accepted_tokens: Option<HashSet<String>>,
    session: Option<String>,
    failing_tables: HashSet<String>,
    failing_ids: HashSet<String>,
    update_calls: usize,
}

/// In-memory record store.
///
/// ## Example
/// ```rust
/// use printdesk_store::MemoryStore;
/// use serde_json::json;
///
/// let store = MemoryStore::new();
/// let id = store.insert("shop_printers", json!({ "shop_id": "s1", "printer_name": "A" }));
///
/// assert_eq!(store.rows("shop_printers").len(), 1);
/// assert!(store.row("shop_printers", &id).is_some());
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Creates an empty store that accepts any non-empty token.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A panic while holding the lock only happens inside a failing test.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Inserts a row, generating an `id` when it has none. Returns the id.
    pub fn insert(&self, table: &str, row: Value) -> String {
        let mut object = match row {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        let id = match object.get("id") {
            Some(Value::String(id)) => id.clone(),
            Some(other) => other.to_string(),
            None => {
                let id = Uuid::new_v4().to_string();
                object.insert("id".into(), Value::String(id.clone()));
                id
            }
        };

        self.lock()
            .tables
            .entry(table.to_string())
            .or_default()
            .push(Value::Object(object));
        id
    }

    /// Returns a copy of every row in `table`.
    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.lock().tables.get(table).cloned().unwrap_or_default()
    }

    /// Returns the row with the given id.
    pub fn row(&self, table: &str, id: &str) -> Option<Value> {
        self.rows(table)
            .into_iter()
            .find(|row| row.get("id").and_then(Value::as_str) == Some(id))
    }

    /// Only these tokens will be accepted by `attach_session`.
    pub fn accept_token(&self, token: &str) {
        self.lock()
            .accepted_tokens
            .get_or_insert_with(HashSet::new)
            .insert(token.to_string());
    }

    /// Makes every query against `table` fail.
    pub fn fail_queries_on(&self, table: &str) {
        self.lock().failing_tables.insert(table.to_string());
    }

    /// Makes every update of row `id` fail.
    pub fn fail_updates_for(&self, id: &str) {
        self.lock().failing_ids.insert(id.to_string());
    }

    /// Number of `update` calls received, failed ones included.
    pub fn update_count(&self) -> usize {
        self.lock().update_calls
    }

    /// Currently attached session token.
    pub fn session(&self) -> Option<String> {
        self.lock().session.clone()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn attach_session(&self, access_token: &str) -> StoreResult<()> {
        let token = access_token.trim();
        if token.is_empty() {
            return Err(StoreError::MissingCredentials);
        }

        let mut inner = self.lock();
        if let Some(accepted) = &inner.accepted_tokens {
            if !accepted.contains(token) {
                return Err(StoreError::Unauthorized("invalid JWT".into()));
            }
        }

        inner.session = Some(token.to_string());
        Ok(())
    }

    async fn query(&self, table: &str, filter: &Filter) -> StoreResult<Vec<Value>> {
        let inner = self.lock();
        if inner.failing_tables.contains(table) {
            return Err(StoreError::QueryFailed {
                table: table.to_string(),
                message: "injected failure".into(),
            });
        }

        let mut rows: Vec<Value> = inner
            .tables
            .get(table)
            .map(|rows| rows.iter().filter(|r| filter.matches(r)).cloned().collect())
            .unwrap_or_default();

        if let Some(column) = filter.order_column() {
            rows.sort_by(|a, b| {
                let a = a.get(column).map(Value::to_string).unwrap_or_default();
                let b = b.get(column).map(Value::to_string).unwrap_or_default();
                a.cmp(&b)
            });
        }

        Ok(rows)
    }

    async fn update(&self, table: &str, id: &str, fields: Value) -> StoreResult<()> {
        let mut inner = self.lock();
        inner.update_calls += 1;

        if inner.failing_ids.contains(id) {
            return Err(StoreError::UpdateFailed {
                table: table.to_string(),
                id: id.to_string(),
                message: "injected failure".into(),
            });
        }

        let row = inner
            .tables
            .get_mut(table)
            .and_then(|rows| {
                rows.iter_mut()
                    .find(|row| row.get("id").and_then(Value::as_str) == Some(id))
            })
            .ok_or_else(|| StoreError::NotFound {
                table: table.to_string(),
                id: id.to_string(),
            })?;

        if let (Value::Object(target), Value::Object(changes)) = (row, fields) {
            for (key, value) in changes {
                target.insert(key, value);
            }
        }

        Ok(())
    }
}
