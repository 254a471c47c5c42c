//! # Configuration State
//!
//! The part of the monitor configuration the dashboard gets to see.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`PRINTDESK_*`)
//! 2. Config file (`printdesk.toml`)
//! 3. Defaults
//!
//! Store credentials never leave the backend; the dashboard only learns
//! whether a store is configured.

use serde::{Deserialize, Serialize};

use printdesk_monitor::{MonitorConfig, Platform};

/// Read-only configuration summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Monitoring poll interval in milliseconds
    pub poll_interval_ms: u64,

    /// Upper bound for one OS printer command, in seconds
    pub probe_timeout_secs: u64,

    /// Whether `[store]` has both a URL and a key
    pub store_configured: bool,

    /// `windows`, `macos`, `linux` or `unsupported`
    pub platform: String,
}

impl ConfigState {
    /// Summarizes `config` for the current platform.
    pub fn from_config(config: &MonitorConfig) -> Self {
        ConfigState {
            poll_interval_ms: config.monitor.poll_interval_ms,
            probe_timeout_secs: config.monitor.probe_timeout_secs,
            store_configured: config.has_store(),
            platform: Platform::current().to_string(),
        }
    }
}

impl Default for ConfigState {
    fn default() -> Self {
        Self::from_config(&MonitorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = ConfigState::default();
        assert_eq!(config.poll_interval_ms, 10_000);
        assert_eq!(config.probe_timeout_secs, 15);
        assert!(!config.store_configured);
    }

    #[test]
    fn test_store_configured() {
        let mut monitor = MonitorConfig::default();
        monitor.store.url = Some("https://xyz.supabase.co".into());
        monitor.store.anon_key = Some("anon".into());

        assert!(ConfigState::from_config(&monitor).store_configured);
    }

    #[test]
    fn test_serializes_camel_case() {
        let config = ConfigState {
            poll_interval_ms: 5000,
            probe_timeout_secs: 10,
            store_configured: true,
            platform: "linux".into(),
        };

        assert_eq!(
            serde_json::to_value(&config).unwrap(),
            json!({
                "pollIntervalMs": 5000,
                "probeTimeoutSecs": 10,
                "storeConfigured": true,
                "platform": "linux"
            })
        );
    }
}
