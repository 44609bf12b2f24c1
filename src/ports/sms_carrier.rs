//! SMS carrier port for outbound text messages.
//!
//! Defines the contract for carrier integrations (e.g., Twilio).
//!
//! # Design
//!
//! Carrier failures are an explicit sum type. An unverified recipient is a
//! named variant rather than "whatever the typed errors did not cover", so
//! callers can tell it apart from rejections and transport problems.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::foundation::SmsAccount;

/// Port for SMS carrier integrations.
#[async_trait]
pub trait SmsCarrier: Send + Sync {
    /// Submit one message using the tenant's carrier account.
    async fn send(
        &self,
        account: &SmsAccount,
        message: &SmsMessage,
    ) -> Result<CarrierReceipt, CarrierError>;
}

/// Outbound text message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsMessage {
    pub from: String,
    pub to: String,
    pub body: String,
}

impl SmsMessage {
    pub fn new(from: impl Into<String>, to: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            body: body.into(),
        }
    }
}

/// Carrier acknowledgement of an accepted message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarrierReceipt {
    /// Carrier's message ID.
    pub sid: Option<String>,

    /// Carrier-reported status (e.g., "queued").
    pub status: Option<String>,

    /// Error code attached to an accepted message, if any.
    pub error_code: Option<String>,
}

impl CarrierReceipt {
    /// Receipt for a message accepted without an error code.
    pub fn accepted(sid: impl Into<String>) -> Self {
        Self {
            sid: Some(sid.into()),
            status: Some("queued".to_string()),
            error_code: None,
        }
    }

    /// Receipt for a message accepted but flagged with `code`.
    pub fn with_error_code(code: impl Into<String>) -> Self {
        Self {
            sid: None,
            status: Some("failed".to_string()),
            error_code: Some(code.into()),
        }
    }
}

/// Errors from carrier operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CarrierError {
    /// The carrier refused the request with a typed error.
    #[error("carrier rejected message: {message}")]
    Rejected {
        /// Carrier's error code (if available).
        code: Option<String>,
        /// Carrier's human-readable message.
        message: String,
    },

    /// The recipient number is not verified for this account.
    #[error("recipient number is unverified")]
    UnverifiedNumber,

    /// The carrier did not answer in time.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// Anything the adapter could not classify.
    #[error("carrier error: {0}")]
    Other(String),
}

impl CarrierError {
    pub fn rejected(code: Option<String>, message: impl Into<String>) -> Self {
        CarrierError::Rejected {
            code,
            message: message.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        CarrierError::Other(message.into())
    }
}
