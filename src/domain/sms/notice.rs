//! User-facing notices.

use super::SmsOutcome;

/// Notice shown after creating an account that was texted a welcome SMS.
pub fn sms_account_creation_notice(resource_name: &str, outcome: &SmsOutcome) -> String {
    match outcome {
        SmsOutcome::Blank => format!("New {} created successfully.", resource_name),
        SmsOutcome::Sent => format!(
            "New {} created successfully. SMS has been sent!",
            resource_name
        ),
        SmsOutcome::Error(detail) => format!(
            "New {} created successfully. SMS not sent. Error: {}.",
            resource_name, detail
        ),
    }
}

/// Notice shown after a user profile update.
///
/// `confirmation_pending` is true when the email changed and now awaits
/// confirmation.
pub fn unconfirmed_email_notice(role: &str, confirmation_pending: bool) -> String {
    let mut notice = format!("{} was successfully updated.", role);
    if confirmation_pending {
        notice.push_str(" Confirmation Email Sent.");
    }
    notice
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_notice_mentions_only_creation() {
        assert_eq!(
            sms_account_creation_notice("supervisor", &SmsOutcome::Blank),
            "New supervisor created successfully."
        );
    }

    #[test]
    fn error_notice_carries_detail() {
        assert_eq!(
            sms_account_creation_notice("volunteer", &SmsOutcome::error("30003")),
            "New volunteer created successfully. SMS not sent. Error: 30003."
        );
    }

    #[test]
    fn email_notice_without_pending_confirmation() {
        assert_eq!(
            unconfirmed_email_notice("Volunteer", false),
            "Volunteer was successfully updated."
        );
    }

    #[test]
    fn email_notice_with_pending_confirmation() {
        assert_eq!(
            unconfirmed_email_notice("Supervisor", true),
            "Supervisor was successfully updated. Confirmation Email Sent."
        );
    }
}
