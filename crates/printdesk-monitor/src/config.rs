//! # Monitor Configuration
//!
//! Configuration for printer monitoring and the record store connection.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     PRINTDESK_POLL_INTERVAL_MS=5000                                    │
//! │     PRINTDESK_STORE_URL=https://xyz.supabase.co                        │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/printdesk/printdesk.toml (Linux)                         │
//! │     ~/Library/Application Support/com.printdesk.desktop/... (macOS)    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     10 s polling, 15 s probe timeout, table "shop_printers"            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # printdesk.toml
//! [monitor]
//! poll_interval_ms = 10000
//! probe_timeout_secs = 15
//!
//! [store]
//! url = "https://xyz.supabase.co"
//! anon_key = "eyJhbGciOi..."
//! printers_table = "shop_printers"
//! request_timeout_secs = 30
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use printdesk_core::validation::validate_poll_interval;
use printdesk_core::{DEFAULT_POLL_INTERVAL_MS, PRINTERS_TABLE};

use crate::error::{MonitorError, MonitorResult};

// =============================================================================
// Monitor Settings
// =============================================================================

/// Polling and probing settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorSettings {
    /// Interval between reconciliation passes (milliseconds).
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Upper bound for a single OS printer command (seconds).
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,
}

fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

fn default_probe_timeout() -> u64 {
    15
}

impl Default for MonitorSettings {
    fn default() -> Self {
        MonitorSettings {
            poll_interval_ms: default_poll_interval(),
            probe_timeout_secs: default_probe_timeout(),
        }
    }
}

// =============================================================================
// Store Settings
// =============================================================================

/// Record store connection defaults.
///
/// Requests may carry their own URL and key; these are used when they don't.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Base URL of the record store.
    #[serde(default)]
    pub url: Option<String>,

    /// Public (anon) API key.
    #[serde(default)]
    pub anon_key: Option<String>,

    /// Table holding shop-registered printers.
    #[serde(default = "default_printers_table")]
    pub printers_table: String,

    /// HTTP request timeout (seconds).
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_printers_table() -> String {
    PRINTERS_TABLE.to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            url: None,
            anon_key: None,
            printers_table: default_printers_table(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

// =============================================================================
// Main Monitor Configuration
// =============================================================================

/// Complete monitor configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Polling settings.
    #[serde(default)]
    pub monitor: MonitorSettings,

    /// Record store settings.
    #[serde(default)]
    pub store: StoreSettings,
}

impl MonitorConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (printdesk.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> MonitorResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading monitor config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load monitor config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> MonitorResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| MonitorError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| MonitorError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| MonitorError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Monitor config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> MonitorResult<()> {
        validate_poll_interval(self.monitor.poll_interval_ms)
            .map_err(|e| MonitorError::InvalidConfig(e.to_string()))?;

        if self.monitor.probe_timeout_secs == 0 {
            return Err(MonitorError::InvalidConfig(
                "probe_timeout_secs must be greater than 0".into(),
            ));
        }

        if self.store.request_timeout_secs == 0 {
            return Err(MonitorError::InvalidConfig(
                "request_timeout_secs must be greater than 0".into(),
            ));
        }

        if let Some(ref raw) = self.store.url {
            let url = url::Url::parse(raw)?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(MonitorError::InvalidUrl(format!(
                    "Store URL must start with http:// or https://, got: {}",
                    raw
                )));
            }
        }

        if self.store.printers_table.trim().is_empty() {
            return Err(MonitorError::InvalidConfig(
                "printers_table must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(raw) = lookup("PRINTDESK_POLL_INTERVAL_MS") {
            match raw.parse::<u64>() {
                Ok(ms) => {
                    debug!(poll_interval_ms = ms, "Overriding poll interval from environment");
                    self.monitor.poll_interval_ms = ms;
                }
                Err(_) => warn!(value = %raw, "Ignoring invalid PRINTDESK_POLL_INTERVAL_MS"),
            }
        }

        if let Some(raw) = lookup("PRINTDESK_PROBE_TIMEOUT_SECS") {
            match raw.parse::<u64>() {
                Ok(secs) => self.monitor.probe_timeout_secs = secs,
                Err(_) => warn!(value = %raw, "Ignoring invalid PRINTDESK_PROBE_TIMEOUT_SECS"),
            }
        }

        if let Some(url) = lookup("PRINTDESK_STORE_URL") {
            debug!(url = %url, "Overriding store URL from environment");
            self.store.url = Some(url);
        }

        if let Some(key) = lookup("PRINTDESK_STORE_KEY") {
            self.store.anon_key = Some(key);
        }

        if let Some(table) = lookup("PRINTDESK_PRINTERS_TABLE") {
            self.store.printers_table = table;
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "printdesk", "desktop")
            .map(|dirs| dirs.config_dir().join("printdesk.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Interval between reconciliation passes.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.monitor.poll_interval_ms)
    }

    /// Timeout for one OS printer command.
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.monitor.probe_timeout_secs)
    }

    /// Timeout for one record store request.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.store.request_timeout_secs)
    }

    /// Returns true when both a store URL and key are configured.
    pub fn has_store(&self) -> bool {
        let set = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        set(&self.store.url) && set(&self.store.anon_key)
    }
}
