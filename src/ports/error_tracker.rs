//! Error tracking port.
//!
//! Unexpected failures are forwarded here for operator visibility.
//!
//! # Contract
//!
//! - `notify` is fire-and-forget: it must return promptly and never block
//!   response delivery
//! - Failures of the tracking call itself are swallowed by the
//!   implementation (logged, never returned)

use serde::Serialize;
use thiserror::Error;

use crate::domain::foundation::{Timestamp, UnclassifiedError};

/// Port for error tracking services.
pub trait ErrorTracker: Send + Sync {
    fn notify(&self, report: ErrorReport);
}

/// One unexpected failure, as sent to the tracking service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    /// Error type name.
    pub error_class: String,

    pub message: String,

    /// Request the failure escaped from, e.g. `GET /volunteers/42`.
    pub context: Option<String>,

    /// Identity of the principal, when known.
    pub user_id: Option<String>,

    pub occurred_at: Timestamp,
}

impl ErrorReport {
    pub fn new(error_class: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_class: error_class.into(),
            message: message.into(),
            context: None,
            user_id: None,
            occurred_at: Timestamp::now(),
        }
    }

    /// Builds a report from an unclassified failure.
    pub fn from_unclassified(error: &UnclassifiedError) -> Self {
        Self::new(error.type_name(), error.to_string())
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}

/// Errors from the tracking transport. Only ever logged.
#[derive(Debug, Clone, Error)]
pub enum TrackingError {
    #[error("Tracking service unreachable: {0}")]
    Network(String),

    #[error("Tracking service rejected report with status {0}")]
    Rejected(u16),

    #[error("No async runtime available to deliver report")]
    NoRuntime,
}
