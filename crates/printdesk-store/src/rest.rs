//! # REST Record Store
//!
//! HTTP client for a PostgREST-style record store (the dialect Supabase
//! exposes under `/rest/v1`).
//!
//! ## Wire Contract
//! ```text
//! attach_session   GET   {url}/auth/v1/user
//!                        apikey: {key}   Authorization: Bearer {token}
//!
//! query            GET   {url}/rest/v1/{table}?select=*&{col}=eq.{v}&order={col}.asc
//!                        apikey: {key}   Authorization: Bearer {token | key}
//!
//! update           PATCH {url}/rest/v1/{table}?id=eq.{id}
//!                        Prefer: return=representation
//!                        body: {"status": "...", "last_heartbeat": "..."}
//! ```
//!
//! An update that comes back with an empty representation matched no row
//! (deleted printer, or row-level security hid it) and is reported as
//! [`StoreError::NotFound`].

use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use tracing::{debug, info};
use url::Url;

use crate::credentials::{inspect_token, TokenKind};
use crate::error::{StoreError, StoreResult};
use crate::record::{Filter, RecordStore};

/// PostgREST/Supabase record store client.
pub struct RestStore {
    client: Client,
    base_url: String,
    api_key: String,
    session: RwLock<Option<String>>,
}

impl std::fmt::Debug for RestStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestStore")
            .field("base_url", &self.base_url)
            .field("has_session", &self.has_session())
            .finish()
    }
}

impl RestStore {
    /// Creates a client for the store at `url`, authenticated with the
    /// project's public `api_key`.
    pub fn new(url: &str, api_key: &str, timeout: Duration) -> StoreResult<Self> {
        let base_url = parse_base_url(url)?;

        if api_key.trim().is_empty() {
            return Err(StoreError::MissingCredentials);
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::ConnectionFailed(format!("failed to build HTTP client: {e}")))?;

        Ok(RestStore {
            client,
            base_url,
            api_key: api_key.trim().to_string(),
            session: RwLock::new(None),
        })
    }

    /// Returns the normalized base URL (no trailing slash).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns true once a session token has been attached.
    pub fn has_session(&self) -> bool {
        self.session.read().map(|s| s.is_some()).unwrap_or(false)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Bearer token for data requests: the session if attached, else the key.
    fn bearer(&self) -> String {
        self.session
            .read()
            .ok()
            .and_then(|s| s.clone())
            .unwrap_or_else(|| self.api_key.clone())
    }

    fn authorized(&self, request: RequestBuilder, bearer: &str) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(bearer)
            .header("Accept", "application/json")
    }
}

#[async_trait]
impl RecordStore for RestStore {
    async fn attach_session(&self, access_token: &str) -> StoreResult<()> {
        let token = access_token.trim();
        if let TokenKind::Jwt(claims) = inspect_token(token, Utc::now())? {
            debug!(sub = ?claims.sub, expires_at = ?claims.expires_at(), "Access token inspected");
        }

        let response = self
            .authorized(self.client.get(self.endpoint("auth/v1/user")), token)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Unauthorized(error_message(status, &body)));
        }
        if !status.is_success() {
            return Err(unexpected(response).await);
        }

        if let Ok(mut session) = self.session.write() {
            *session = Some(token.to_string());
        }

        info!(base_url = %self.base_url, "Record store session attached");
        Ok(())
    }

    async fn query(&self, table: &str, filter: &Filter) -> StoreResult<Vec<Value>> {
        let mut params: Vec<(String, String)> = vec![("select".into(), "*".into())];
        for (column, value) in filter.conditions() {
            params.push((column.clone(), format!("eq.{value}")));
        }
        if let Some(column) = filter.order_column() {
            params.push(("order".into(), format!("{column}.asc")));
        }

        let request = self
            .client
            .get(self.endpoint(&format!("rest/v1/{table}")))
            .query(&params);

        let response = self.authorized(request, &self.bearer()).send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Unauthorized(error_message(status, &body)));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::QueryFailed {
                table: table.to_string(),
                message: error_message(status, &body),
            });
        }

        let rows: Vec<Value> = response.json().await?;
        debug!(table, rows = rows.len(), "Record store query returned");
        Ok(rows)
    }

    async fn update(&self, table: &str, id: &str, fields: Value) -> StoreResult<()> {
        let request = self
            .client
            .patch(self.endpoint(&format!("rest/v1/{table}")))
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .json(&fields);

        let response = self.authorized(request, &self.bearer()).send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Unauthorized(error_message(status, &body)));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::UpdateFailed {
                table: table.to_string(),
                id: id.to_string(),
                message: error_message(status, &body),
            });
        }

        // 204 means the server ignored `Prefer`; nothing to check.
        if status == StatusCode::NO_CONTENT {
            return Ok(());
        }

        let rows: Vec<Value> = response.json().await?;
        if rows.is_empty() {
            return Err(StoreError::NotFound {
                table: table.to_string(),
                id: id.to_string(),
            });
        }

        Ok(())
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn parse_base_url(url: &str) -> StoreResult<String> {
    let parsed = Url::parse(url.trim())?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(StoreError::InvalidUrl(format!(
                "store URL must use http or https, got: {other}"
            )))
        }
    }

    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

/// Extracts PostgREST's `message` field when present.
fn error_message(status: StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("msg"))
                .or_else(|| v.get("error_description"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string());

    if detail.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("HTTP {}: {detail}", status.as_u16())
    }
}

async fn unexpected(response: Response) -> StoreError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    StoreError::Unexpected {
        status: status.as_u16(),
        message: error_message(status, &body),
    }
}
