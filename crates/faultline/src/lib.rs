//! Asynchronous error-reporting client.
//!
//! Captures an application error plus optional request context, normalizes
//! it into a structured payload (parsed backtrace, canonical CGI-style
//! metadata keys), and delivers it to a remote collector with a single
//! terminal [`Outcome`] per send. Delivery is fire-and-forget: there is no
//! retry, and outcomes are values rather than errors.
//!
//! ```no_run
//! use faultline::{CaughtError, Client, Config, Metadata, ServerInfo};
//!
//! # async fn example() -> Result<(), faultline::ConfigError> {
//! let client = Client::new(Config {
//!     api_key: Some("my-api-key".to_string()),
//!     server: ServerInfo {
//!         name: "web-1".to_string(),
//!         environment_name: Some("production".to_string()),
//!         project_root: Some("/srv/app".to_string()),
//!         ..Default::default()
//!     },
//!     ..Default::default()
//! })?;
//!
//! let outcome = client
//!     .notify(CaughtError::new("something broke"), Metadata::default())
//!     .await;
//! # let _ = outcome;
//! # Ok(())
//! # }
//! ```

pub mod backtrace;
pub mod config;
pub mod errors;
pub mod metadata;
pub mod payload;
pub mod sink;
pub mod transport;

mod client;

// Re-export the public surface
pub use backtrace::Frame;
pub use client::Client;
pub use config::{Config, NotifierInfo, ServerInfo, DEFAULT_ENDPOINT};
pub use errors::ConfigError;
pub use metadata::Metadata;
pub use payload::{CaughtError, ErrorRecord, Payload, RequestContext};
pub use sink::LogSink;
pub use transport::Outcome;
