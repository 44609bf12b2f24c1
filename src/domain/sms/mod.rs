//! SMS domain - outcome of a single delivery attempt and the notice shown
//! to the user afterwards.

mod notice;
mod outcome;

pub use notice::{sms_account_creation_notice, unconfirmed_email_notice};
pub use outcome::{SmsDelivery, SmsOutcome, TIMEOUT_DETAIL, UNVERIFIED_NUMBER_DETAIL};
