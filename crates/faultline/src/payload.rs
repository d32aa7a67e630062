//! Payload assembly: raw error plus metadata in, canonical wire record out.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::backtrace::{parse_backtrace, Frame};
use crate::config::{NotifierInfo, ServerInfo};
use crate::metadata::{cookie_string, merge_cgi_data, Metadata};

/// Fallback error class when the input carries none.
const DEFAULT_ERROR_CLASS: &str = "Error";

/// An error-like value as captured at the call site.
///
/// `stack` is the raw stack text as produced by the runtime; it is parsed
/// and normalized during payload assembly.
#[derive(Debug, Clone)]
pub struct CaughtError {
    pub message: String,
    pub class: String,
    pub stack: Option<String>,
}

impl CaughtError {
    /// Build an error report from a bare message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            class: DEFAULT_ERROR_CLASS.to_string(),
            stack: None,
        }
    }

    /// Build an error report from any [`std::error::Error`].
    pub fn from_error<E: std::error::Error + ?Sized>(err: &E) -> Self {
        Self::new(err.to_string())
    }

    /// Override the reported error class.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = class.into();
        self
    }

    /// Attach raw stack text.
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }
}

/// The error portion of a payload, immutable once constructed.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorRecord {
    pub message: String,
    pub class: String,
    pub backtrace: Vec<Frame>,
}

/// Request context after normalization. The original `headers` and `cookies`
/// inputs do not survive as fields; their contents are folded into
/// `cgi_data`.
#[derive(Debug, Clone, Serialize)]
pub struct RequestContext {
    pub context: serde_json::Map<String, Value>,
    pub session: serde_json::Map<String, Value>,
    pub params: serde_json::Map<String, Value>,
    pub cgi_data: BTreeMap<String, String>,
}

/// The wire-level unit: one instance per send, discarded after the terminal
/// outcome.
#[derive(Debug, Clone, Serialize)]
pub struct Payload {
    pub notifier: NotifierInfo,
    pub error: ErrorRecord,
    pub request: RequestContext,
    pub server: ServerInfo,
}

/// Assemble a payload from an error and its metadata.
///
/// Takes ownership of both inputs, so an in-flight payload can never alias
/// caller state. Missing optional fields degrade to empty collections; this
/// function has no failure path.
pub(crate) fn build_payload(
    error: CaughtError,
    metadata: Metadata,
    server: &ServerInfo,
    notifier: &NotifierInfo,
) -> Payload {
    let backtrace = error
        .stack
        .as_deref()
        .map(|stack| parse_backtrace(stack, server.project_root.as_deref()))
        .unwrap_or_default();

    let class = if error.class.is_empty() {
        DEFAULT_ERROR_CLASS.to_string()
    } else {
        error.class
    };

    let mut cgi_data = merge_cgi_data(&metadata.cgi_data, &metadata.headers);
    if !metadata.cookies.is_empty() {
        // headers take precedence over the cookies convenience field
        cgi_data
            .entry("HTTP_COOKIE".to_string())
            .or_insert_with(|| cookie_string(&metadata.cookies));
    }

    Payload {
        notifier: notifier.clone(),
        error: ErrorRecord {
            message: error.message,
            class,
            backtrace,
        },
        request: RequestContext {
            context: metadata.context,
            session: metadata.session,
            params: metadata.params,
            cgi_data,
        },
        server: server.clone(),
    }
}
