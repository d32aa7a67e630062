//! Asynchronous delivery to the collector and outcome classification.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::payload::Payload;
use crate::sink::{guarded_error, guarded_info, LogSink};

/// Terminal result of one delivery attempt. Exactly one is produced per
/// non-suppressed send; none is ever retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The collector acknowledged the payload with a 2xx status.
    Sent {
        /// Identifier assigned by the collector, empty when the response
        /// body carried none.
        id: String,
    },
    /// The collector responded with a non-2xx status.
    RemoteError { status: u16, body: String },
    /// The request failed below the HTTP layer (connect, DNS, timeout).
    TransportError { detail: String },
}

/// Owns the HTTP client and credential; created only for enabled clients.
pub(crate) struct Dispatcher {
    http: reqwest::Client,
    notices_url: String,
    api_key: String,
    sink: Option<Arc<dyn LogSink>>,
}

impl Dispatcher {
    pub(crate) fn new(
        http: reqwest::Client,
        notices_url: String,
        api_key: String,
        sink: Option<Arc<dyn LogSink>>,
    ) -> Self {
        Self {
            http,
            notices_url,
            api_key,
            sink,
        }
    }

    /// POST one payload and classify the result.
    ///
    /// State machine: Sending -> {Sent | RemoteError | TransportError}. The
    /// sink is invoked once per outcome, after the outcome is decided, and
    /// cannot affect it.
    pub(crate) async fn dispatch(&self, payload: &Payload) -> Outcome {
        debug!(url = %self.notices_url, class = %payload.error.class, "delivering error report");

        let response = self
            .http
            .post(&self.notices_url)
            .header("X-API-Key", &self.api_key)
            .json(payload)
            .send()
            .await;

        match response {
            Ok(resp) => {
                let status = resp.status();
                let body = resp.text().await.unwrap_or_default();

                if status.is_success() {
                    let id = extract_id(&body);
                    info!(id = %id, "error report delivered");
                    guarded_info(&self.sink, &format!("error report delivered: id={}", id));
                    Outcome::Sent { id }
                } else {
                    warn!(status = status.as_u16(), "collector rejected error report");
                    guarded_error(
                        &self.sink,
                        &format!(
                            "collector rejected error report: status={} body={}",
                            status.as_u16(),
                            body
                        ),
                    );
                    Outcome::RemoteError {
                        status: status.as_u16(),
                        body,
                    }
                }
            }
            Err(err) => {
                let detail = err.to_string();
                warn!(error = %detail, "error report delivery failed");
                guarded_error(
                    &self.sink,
                    &format!("error report delivery failed: {}", detail),
                );
                Outcome::TransportError { detail }
            }
        }
    }
}

/// Pull the identifier out of a success response body, tolerating string or
/// numeric ids and unparseable bodies.
fn extract_id(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value.get("id").map(|id| match id {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_id_from_string_field() {
        assert_eq!(extract_id(r#"{"id":"abc-123"}"#), "abc-123");
    }

    #[test]
    fn test_extract_id_from_numeric_field() {
        assert_eq!(extract_id(r#"{"id":42}"#), "42");
    }

    #[test]
    fn test_extract_id_tolerates_garbage() {
        assert_eq!(extract_id("not json"), "");
        assert_eq!(extract_id(r#"{"other":true}"#), "");
    }
}
