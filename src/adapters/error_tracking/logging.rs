//! Log-only error tracker.

use crate::ports::{ErrorReport, ErrorTracker};

/// Error tracker that writes each report as an `error` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogErrorTracker;

impl LogErrorTracker {
    pub fn new() -> Self {
        Self
    }
}

impl ErrorTracker for LogErrorTracker {
    fn notify(&self, report: ErrorReport) {
        tracing::error!(
            error_class = %report.error_class,
            context = report.context.as_deref().unwrap_or("-"),
            user_id = report.user_id.as_deref().unwrap_or("-"),
            occurred_at = %report.occurred_at.to_rfc3339(),
            "{}",
            report.message
        );
    }
}
