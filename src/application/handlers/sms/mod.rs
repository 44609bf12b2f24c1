//! SMS command handlers.
//!
//! - `DeliverSmsCommand` - Text a newly created account, best effort

mod deliver_sms;

pub use deliver_sms::{DeliverSmsCommand, DeliverSmsHandler, DEFAULT_SMS_TIMEOUT};
