//! Client configuration and the descriptors embedded in every payload.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::sink::LogSink;

/// Default collector endpoint, overridable per client.
pub const DEFAULT_ENDPOINT: &str = "https://api.faultline.dev";

/// Collector path that accepts error payloads.
pub const NOTICES_PATH: &str = "/v1/notices";

/// Default HTTP request timeout for deliveries.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environments in which reporting is suppressed unless overridden.
pub fn default_development_environments() -> Vec<String> {
    vec![
        "dev".to_string(),
        "development".to_string(),
        "test".to_string(),
    ]
}

/// Describes the reporting host. Set once at construction and embedded in
/// every payload; only `environment_name` is expected to change between
/// sends, via [`crate::Client::set_environment_name`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerInfo {
    /// Host name as it should appear in the collector UI.
    pub name: String,
    /// Deployment role (web, worker, ...), if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Named runtime environment, checked against the development set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment_name: Option<String>,
    /// Filesystem root of the application, used for backtrace path
    /// substitution.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_root: Option<String>,
}

/// Identifies the reporting library itself inside each payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierInfo {
    pub name: String,
    pub url: String,
    pub version: String,
}

impl Default for NotifierInfo {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            url: env!("CARGO_PKG_REPOSITORY").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Construction-time configuration for [`crate::Client`].
#[derive(Clone)]
pub struct Config {
    /// Collector credential. `None` or empty disables the client for its
    /// entire lifetime.
    pub api_key: Option<String>,
    /// Collector base URL.
    pub endpoint: String,
    /// Host descriptor embedded in every payload.
    pub server: ServerInfo,
    /// Notifier descriptor, defaulted to this crate's identity.
    pub notifier: NotifierInfo,
    /// Environments in which sends are suppressed. Defaults to
    /// `["dev", "development", "test"]`.
    pub development_environments: Vec<String>,
    /// Optional sink invoked with a short record on each delivery outcome.
    pub sink: Option<Arc<dyn LogSink>>,
    /// HTTP request timeout for deliveries.
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            server: ServerInfo::default(),
            notifier: NotifierInfo::default(),
            development_environments: default_development_environments(),
            sink: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notifier_defaults_to_crate_identity() {
        let notifier = NotifierInfo::default();
        assert_eq!(notifier.name, "faultline");
        assert!(!notifier.version.is_empty());
    }

    #[test]
    fn test_default_development_environments_are_restrictive() {
        let envs = default_development_environments();
        assert!(envs.contains(&"development".to_string()));
        assert!(envs.contains(&"test".to_string()));
        assert!(!envs.contains(&"production".to_string()));
    }

    #[test]
    fn test_server_info_omits_absent_fields_when_serialized() {
        let json = serde_json::to_value(ServerInfo {
            name: "web-1".to_string(),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(json["name"], "web-1");
        assert!(json.get("role").is_none());
        assert!(json.get("project_root").is_none());
    }
}
