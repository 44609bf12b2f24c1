//! DeliverSmsHandler - Best-effort SMS to a newly created account.
//!
//! Delivery never fails the surrounding operation: every carrier result,
//! including errors and timeouts, is folded into an `SmsOutcome` and a
//! notice string.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::foundation::{Principal, Tenant};
use crate::domain::sms::{SmsDelivery, SmsOutcome, TIMEOUT_DETAIL, UNVERIFIED_NUMBER_DETAIL};
use crate::ports::{CarrierError, CarrierReceipt, SmsCarrier, SmsMessage};

/// Default bound on a single carrier call.
pub const DEFAULT_SMS_TIMEOUT: Duration = Duration::from_secs(10);

/// Command to text `body` to `recipient`.
#[derive(Debug, Clone)]
pub struct DeliverSmsCommand {
    /// Account that was just created and should receive the message.
    pub recipient: Principal,

    /// Tenant whose sender number and carrier account are used.
    pub tenant: Tenant,

    /// Resource name used in the notice (e.g., "volunteer").
    pub resource_name: String,

    pub body: String,
}

/// Handler for SMS delivery.
pub struct DeliverSmsHandler {
    carrier: Arc<dyn SmsCarrier>,
    timeout: Duration,
}

impl DeliverSmsHandler {
    pub fn new(carrier: Arc<dyn SmsCarrier>) -> Self {
        Self {
            carrier,
            timeout: DEFAULT_SMS_TIMEOUT,
        }
    }

    /// Sets the bound on a single carrier call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn handle(&self, cmd: DeliverSmsCommand) -> SmsDelivery {
        let outcome = self.deliver(&cmd).await;

        tracing::info!(
            recipient = %cmd.recipient.id,
            organization = %cmd.tenant.id,
            outcome = outcome.label(),
            "SMS delivery finished"
        );

        SmsDelivery::for_account_creation(&cmd.resource_name, outcome)
    }

    async fn deliver(&self, cmd: &DeliverSmsCommand) -> SmsOutcome {
        let Some(to) = cmd.recipient.reachable_phone_number() else {
            return SmsOutcome::Blank;
        };
        let Some((from, account)) = cmd.tenant.sms.sendable() else {
            return SmsOutcome::Blank;
        };

        let message = SmsMessage::new(from, to, cmd.body.clone());

        match tokio::time::timeout(self.timeout, self.carrier.send(account, &message)).await {
            Ok(result) => classify(result),
            Err(_elapsed) => {
                tracing::warn!(
                    timeout_secs = self.timeout.as_secs(),
                    "SMS carrier call timed out"
                );
                SmsOutcome::error(TIMEOUT_DETAIL)
            }
        }
    }
}

/// Reduces a carrier result to an outcome.
fn classify(result: Result<CarrierReceipt, CarrierError>) -> SmsOutcome {
    match result {
        Ok(receipt) => match receipt.error_code {
            None => SmsOutcome::Sent,
            Some(code) => SmsOutcome::Error(code),
        },
        Err(CarrierError::Rejected { message, .. }) => SmsOutcome::Error(message),
        Err(CarrierError::UnverifiedNumber) => SmsOutcome::error(UNVERIFIED_NUMBER_DETAIL),
        Err(CarrierError::Timeout { .. }) => SmsOutcome::error(TIMEOUT_DETAIL),
        Err(CarrierError::Other(detail)) => {
            // Unclassified carrier errors have historically meant an
            // unverified recipient on trial accounts.
            tracing::warn!(error = %detail, "Unclassified SMS carrier error");
            SmsOutcome::error(UNVERIFIED_NUMBER_DETAIL)
        }
    }
}
