//! Tenant (organization) types.
//!
//! A tenant is resolved per request alongside the principal and passed
//! explicitly to anything that needs it. There is no ambient "current
//! organization".

use secrecy::SecretString;
use thiserror::Error;

use super::OrganizationId;

/// Carrier account credentials owned by a tenant.
#[derive(Debug, Clone)]
pub struct SmsAccount {
    /// Carrier account identifier (Twilio account SID).
    pub account_sid: String,

    /// Carrier API secret.
    pub auth_token: SecretString,
}

impl SmsAccount {
    pub fn new(account_sid: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            account_sid: account_sid.into(),
            auth_token: SecretString::new(auth_token.into()),
        }
    }
}

/// Per-tenant SMS configuration.
#[derive(Debug, Clone, Default)]
pub struct SmsSettings {
    /// Whether the tenant turned SMS notifications on.
    pub enabled: bool,

    /// Number messages are sent from.
    pub sender_number: Option<String>,

    pub account: Option<SmsAccount>,
}

impl SmsSettings {
    /// Settings for a tenant that has SMS switched off.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Settings for a tenant that sends SMS from `sender_number`.
    pub fn enabled(sender_number: impl Into<String>, account: SmsAccount) -> Self {
        Self {
            enabled: true,
            sender_number: Some(sender_number.into()),
            account: Some(account),
        }
    }

    /// Returns the sender number and account when SMS can actually be sent.
    ///
    /// A tenant with the flag on but no sender or credentials is treated as
    /// disabled.
    pub fn sendable(&self) -> Option<(&str, &SmsAccount)> {
        if !self.enabled {
            return None;
        }
        let sender = self.sender_number.as_deref().filter(|s| !s.trim().is_empty())?;
        Some((sender, self.account.as_ref()?))
    }
}

/// The organization scope of a request.
#[derive(Debug, Clone)]
pub struct Tenant {
    pub id: OrganizationId,
    pub name: String,
    pub sms: SmsSettings,
}

impl Tenant {
    pub fn new(id: OrganizationId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            sms: SmsSettings::disabled(),
        }
    }

    pub fn with_sms(mut self, sms: SmsSettings) -> Self {
        self.sms = sms;
        self
    }

    /// Whether principals of this tenant can receive SMS.
    pub fn sms_enabled(&self) -> bool {
        self.sms.sendable().is_some()
    }
}

/// Errors raised while resolving the tenant of a request.
#[derive(Debug, Clone, Error)]
pub enum TenantError {
    /// No organization matches the request.
    #[error("Unknown organization: {0}")]
    UnknownTenant(String),

    /// The tenant directory could not be reached.
    #[error("Tenant lookup failed: {0}")]
    Unavailable(String),
}
