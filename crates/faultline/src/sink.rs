//! Injected logging sink for delivery outcomes.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::warn;

/// Narrow logging interface supplied by the host application.
///
/// Both methods receive a short descriptive record. Implementations run on
/// the delivery path and should return quickly; a panicking sink is caught
/// and ignored so it can never swallow or duplicate a delivery outcome.
pub trait LogSink: Send + Sync {
    /// Called once per successful delivery.
    fn info(&self, record: &str);
    /// Called once per remote rejection or transport failure.
    fn error(&self, record: &str);
}

/// Invoke the info sink, isolating panics from the delivery path.
pub(crate) fn guarded_info(sink: &Option<Arc<dyn LogSink>>, record: &str) {
    if let Some(sink) = sink {
        if catch_unwind(AssertUnwindSafe(|| sink.info(record))).is_err() {
            warn!("log sink panicked while recording a delivery outcome");
        }
    }
}

/// Invoke the error sink, isolating panics from the delivery path.
pub(crate) fn guarded_error(sink: &Option<Arc<dyn LogSink>>, record: &str) {
    if let Some(sink) = sink {
        if catch_unwind(AssertUnwindSafe(|| sink.error(record))).is_err() {
            warn!("log sink panicked while recording a delivery outcome");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct PanickingSink;

    impl LogSink for PanickingSink {
        fn info(&self, _record: &str) {
            panic!("sink blew up");
        }
        fn error(&self, _record: &str) {
            panic!("sink blew up");
        }
    }

    #[test]
    fn test_sink_panic_is_isolated() {
        let sink: Option<Arc<dyn LogSink>> = Some(Arc::new(PanickingSink));
        guarded_info(&sink, "record");
        guarded_error(&sink, "record");
    }

    #[test]
    fn test_absent_sink_is_a_no_op() {
        guarded_info(&None, "record");
        guarded_error(&None, "record");
    }
}
