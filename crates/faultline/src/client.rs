//! The reporting client: gates, builds, and dispatches error reports.

use tracing::{debug, info};
use url::Url;

use crate::config::{Config, NotifierInfo, ServerInfo, NOTICES_PATH};
use crate::errors::ConfigError;
use crate::metadata::Metadata;
use crate::payload::{build_payload, CaughtError};
use crate::transport::{Dispatcher, Outcome};

/// Asynchronous error-reporting client.
///
/// Cheap to share behind an `Arc`; [`Client::notify`] takes `&self`, and
/// concurrent sends are independent. Whether reporting is possible at all is
/// decided once, at construction: without an API key the client is a no-op
/// for its entire lifetime.
pub struct Client {
    dispatcher: Option<Dispatcher>,
    server: ServerInfo,
    notifier: NotifierInfo,
    development_environments: Vec<String>,
}

impl Client {
    /// Create a client from configuration.
    ///
    /// Fails only on programmer errors: an unparseable endpoint URL or an
    /// HTTP client that cannot be constructed.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        Url::parse(&config.endpoint)?;

        let api_key = config.api_key.filter(|key| !key.trim().is_empty());
        let dispatcher = match api_key {
            Some(key) => {
                let http = reqwest::Client::builder()
                    .timeout(config.timeout)
                    .user_agent(format!(
                        "{}/{}",
                        config.notifier.name, config.notifier.version
                    ))
                    .build()?;
                let notices_url =
                    format!("{}{}", config.endpoint.trim_end_matches('/'), NOTICES_PATH);
                Some(Dispatcher::new(http, notices_url, key, config.sink))
            }
            None => {
                info!("no API key configured, error reporting disabled");
                None
            }
        };

        Ok(Self {
            dispatcher,
            server: config.server,
            notifier: config.notifier,
            development_environments: config.development_environments,
        })
    }

    /// Update the environment name between sends. The only sanctioned
    /// mutation of the server descriptor after construction.
    pub fn set_environment_name(&mut self, environment_name: Option<String>) {
        self.server.environment_name = environment_name;
    }

    /// Report an error to the collector.
    ///
    /// The returned future is the delivery handle: `None` means the send was
    /// suppressed (no credential or development environment) and no network
    /// call was made; `Some(outcome)` is the single terminal event for this
    /// send. Delivery outcomes are never surfaced as `Err` — awaiting this
    /// future cannot fail.
    ///
    /// The payload, including copies of all metadata, is assembled before
    /// the first await point, so nothing the caller does afterwards can
    /// affect an in-flight report. Fire-and-forget callers can
    /// `tokio::spawn` the future and drop the handle.
    pub async fn notify(&self, error: CaughtError, metadata: Metadata) -> Option<Outcome> {
        let Some(dispatcher) = &self.dispatcher else {
            debug!("error reporting disabled, report dropped");
            return None;
        };

        if let Some(env) = &self.server.environment_name {
            if self.development_environments.iter().any(|e| e == env) {
                debug!(environment = %env, "development environment, report suppressed");
                return None;
            }
        }

        let payload = build_payload(error, metadata, &self.server, &self.notifier);
        Some(dispatcher.dispatch(&payload).await)
    }
}
