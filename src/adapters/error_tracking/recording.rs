//! In-memory error tracker for tests.

use std::sync::Mutex;

use crate::ports::{ErrorReport, ErrorTracker};

/// Records every report it receives.
#[derive(Debug, Default)]
pub struct RecordingErrorTracker {
    reports: Mutex<Vec<ErrorReport>>,
}

impl RecordingErrorTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<ErrorReport> {
        self.reports.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.reports.lock().unwrap().len()
    }
}

impl ErrorTracker for RecordingErrorTracker {
    fn notify(&self, report: ErrorReport) {
        self.reports.lock().unwrap().push(report);
    }
}
