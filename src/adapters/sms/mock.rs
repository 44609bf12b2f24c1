//! Scripted SMS carrier for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::foundation::SmsAccount;
use crate::ports::{CarrierError, CarrierReceipt, SmsCarrier, SmsMessage};

/// Mock carrier that records messages and returns a fixed result.
///
/// By default every message is accepted without an error code.
#[derive(Debug)]
pub struct MockSmsCarrier {
    result: RwLock<Result<CarrierReceipt, CarrierError>>,
    delay: Option<Duration>,
    sent: RwLock<Vec<SmsMessage>>,
    calls: AtomicUsize,
}

impl Default for MockSmsCarrier {
    fn default() -> Self {
        Self {
            result: RwLock::new(Ok(CarrierReceipt::accepted("SM-mock"))),
            delay: None,
            sent: RwLock::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }
}

impl MockSmsCarrier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the result returned for every message.
    pub fn with_result(self, result: Result<CarrierReceipt, CarrierError>) -> Self {
        *self.result.write().unwrap() = result;
        self
    }

    /// Delays every answer (for timeout tests).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Messages submitted so far, in order.
    pub fn sent_messages(&self) -> Vec<SmsMessage> {
        self.sent.read().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SmsCarrier for MockSmsCarrier {
    async fn send(
        &self,
        _account: &SmsAccount,
        message: &SmsMessage,
    ) -> Result<CarrierReceipt, CarrierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.sent.write().unwrap().push(message.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.result.read().unwrap().clone()
    }
}
