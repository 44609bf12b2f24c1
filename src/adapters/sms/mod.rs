//! SMS carrier adapters.
//!
//! - `TwilioSmsCarrier` - Twilio Programmable Messaging REST API
//! - `MockSmsCarrier` - Scripted carrier for tests

mod mock;
mod twilio;

pub use mock::MockSmsCarrier;
pub use twilio::{TwilioConfig, TwilioSmsCarrier, UNVERIFIED_NUMBER_CODE};
