//! HTTP DTOs for notification endpoints.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::application::handlers::short_url::ShortenUrlsResult;
use crate::domain::foundation::{DomainError, OrganizationId, Principal, Role, UserId};
use crate::domain::short_url::ShortUrlEntry;
use crate::domain::sms::{SmsDelivery, SmsOutcome};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// The account that was just created.
#[derive(Debug, Clone, Deserialize)]
pub struct RecipientRequest {
    pub id: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

impl RecipientRequest {
    /// Builds the recipient principal inside `organization_id`.
    pub fn into_principal(self, organization_id: OrganizationId) -> Result<Principal, DomainError> {
        let mut principal = Principal::new(UserId::new(self.id)?, self.email, self.role, organization_id);
        if let Some(name) = self.display_name {
            principal = principal.with_display_name(name);
        }
        if let Some(phone) = self.phone_number {
            principal = principal.with_phone_number(phone);
        }
        Ok(principal)
    }
}

/// Request to text a welcome message to a new account.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountSmsRequest {
    /// Resource name used in the notice (e.g., "volunteer").
    pub resource_name: String,
    pub recipient: RecipientRequest,
    pub body: String,
}

/// Request for the notice shown after a profile update.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileUpdatedRequest {
    pub role: Role,
    /// True when the email changed and awaits confirmation.
    #[serde(default)]
    pub email_change_pending: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShortenUrlsRequest {
    pub urls: Vec<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct SmsDeliveryResponse {
    /// `blank`, `sent` or `error`.
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub notice: String,
}

impl From<SmsDelivery> for SmsDeliveryResponse {
    fn from(delivery: SmsDelivery) -> Self {
        let outcome = delivery.outcome.label();
        let error = match delivery.outcome {
            SmsOutcome::Error(detail) => Some(detail),
            _ => None,
        };
        Self {
            outcome,
            error,
            notice: delivery.notice,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NoticeResponse {
    pub notice: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenUrlsResponse {
    /// One entry per input URL, in input order.
    pub entries: Vec<ShortUrlEntry>,
    /// Input index to short URL, `null` where shortening failed.
    pub short_urls: BTreeMap<usize, Option<String>>,
}

impl From<ShortenUrlsResult> for ShortenUrlsResponse {
    fn from(result: ShortenUrlsResult) -> Self {
        let short_urls = result.short_urls_by_index();
        Self {
            entries: result.entries,
            short_urls,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipient_deserializes_and_converts() {
        let json = r#"{"id":"u-7","email":"v@example.com","role":"volunteer","phone_number":"+15555550123"}"#;
        let recipient: RecipientRequest = serde_json::from_str(json).unwrap();

        let principal = recipient
            .into_principal(OrganizationId::new("org-1").unwrap())
            .unwrap();

        assert_eq!(principal.id.as_str(), "u-7");
        assert_eq!(principal.role, Role::Volunteer);
        assert_eq!(principal.reachable_phone_number(), Some("+15555550123"));
        assert_eq!(principal.organization_id.as_str(), "org-1");
    }

    #[test]
    fn recipient_with_empty_id_is_rejected() {
        let recipient = RecipientRequest {
            id: String::new(),
            email: "v@example.com".to_string(),
            role: Role::Volunteer,
            display_name: None,
            phone_number: None,
        };

        assert!(recipient
            .into_principal(OrganizationId::new("org-1").unwrap())
            .is_err());
    }

    #[test]
    fn error_delivery_serializes_detail() {
        let delivery = SmsDelivery::for_account_creation("volunteer", SmsOutcome::error("30003"));
        let json = serde_json::to_value(SmsDeliveryResponse::from(delivery)).unwrap();

        assert_eq!(json["outcome"], "error");
        assert_eq!(json["error"], "30003");
        assert_eq!(
            json["notice"],
            "New volunteer created successfully. SMS not sent. Error: 30003."
        );
    }

    #[test]
    fn sent_delivery_omits_error() {
        let delivery = SmsDelivery::for_account_creation("supervisor", SmsOutcome::Sent);
        let json = serde_json::to_value(SmsDeliveryResponse::from(delivery)).unwrap();

        assert_eq!(json["outcome"], "sent");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn shorten_response_keys_by_index() {
        let result = ShortenUrlsResult {
            entries: vec![ShortUrlEntry::shortened("https://sho.rt/a"), ShortUrlEntry::failed()],
        };
        let json = serde_json::to_value(ShortenUrlsResponse::from(result)).unwrap();

        assert_eq!(json["entries"][0]["shortUrl"], "https://sho.rt/a");
        assert_eq!(json["entries"][1]["success"], false);
        assert_eq!(json["shortUrls"]["0"], "https://sho.rt/a");
        assert!(json["shortUrls"]["1"].is_null());
    }
}
