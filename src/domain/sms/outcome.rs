//! Tri-state SMS outcome.

use std::fmt;

use super::notice::sms_account_creation_notice;

/// Detail reported when the carrier refuses the recipient number.
pub const UNVERIFIED_NUMBER_DETAIL: &str = "Phone number is unverified";

/// Detail reported when the carrier did not answer in time.
pub const TIMEOUT_DETAIL: &str = "SMS delivery timed out";

/// Result of one delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SmsOutcome {
    /// No attempt was made (no phone number, or SMS off for the tenant).
    Blank,

    /// The carrier accepted the message without an error code.
    Sent,

    /// The attempt failed; carries a user-readable detail.
    Error(String),
}

impl SmsOutcome {
    pub fn error(detail: impl Into<String>) -> Self {
        SmsOutcome::Error(detail.into())
    }

    pub fn is_sent(&self) -> bool {
        matches!(self, SmsOutcome::Sent)
    }

    /// Short status label, as used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            SmsOutcome::Blank => "blank",
            SmsOutcome::Sent => "sent",
            SmsOutcome::Error(_) => "error",
        }
    }
}

impl fmt::Display for SmsOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SmsOutcome::Error(detail) => write!(f, "error: {}", detail),
            other => f.write_str(other.label()),
        }
    }
}

/// Outcome of a delivery together with the notice built from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsDelivery {
    pub outcome: SmsOutcome,
    pub notice: String,
}

impl SmsDelivery {
    /// Folds an outcome into the account-creation notice for `resource_name`.
    pub fn for_account_creation(resource_name: &str, outcome: SmsOutcome) -> Self {
        let notice = sms_account_creation_notice(resource_name, &outcome);
        Self { outcome, notice }
    }
}
