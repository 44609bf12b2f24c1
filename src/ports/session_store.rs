//! Session store port.
//!
//! Per-session key-value storage for "return to" locations and flash
//! messages. Entries of one session are never visible to another.

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::{Failure, SessionId};

/// Keys a session can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKey {
    /// Where to send the user after signing in.
    UserReturnTo,

    /// Generic referer remembered by non-sign-in flows.
    ReturnTo,

    /// Transient informational message.
    FlashNotice,

    /// Transient warning message.
    FlashAlert,
}

impl SessionKey {
    /// Stable storage name of the key.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKey::UserReturnTo => "user_return_to",
            SessionKey::ReturnTo => "return_to",
            SessionKey::FlashNotice => "flash_notice",
            SessionKey::FlashAlert => "flash_alert",
        }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur during session store operations.
#[derive(Debug, Clone, Error)]
pub enum SessionStoreError {
    #[error("Session store unavailable: {0}")]
    Unavailable(String),
}

impl From<SessionStoreError> for Failure {
    fn from(err: SessionStoreError) -> Self {
        Failure::unclassified(err)
    }
}

/// Port for per-session storage.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value.
    async fn remember(
        &self,
        session: &SessionId,
        key: SessionKey,
        value: &str,
    ) -> Result<(), SessionStoreError>;

    async fn recall(
        &self,
        session: &SessionId,
        key: SessionKey,
    ) -> Result<Option<String>, SessionStoreError>;

    async fn forget(&self, session: &SessionId, key: SessionKey) -> Result<(), SessionStoreError>;

    /// Recall and forget in one step.
    async fn take(
        &self,
        session: &SessionId,
        key: SessionKey,
    ) -> Result<Option<String>, SessionStoreError> {
        let value = self.recall(session, key).await?;
        if value.is_some() {
            self.forget(session, key).await?;
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn SessionStore) {}
    }

    #[test]
    fn store_errors_are_unclassified_failures() {
        let failure: Failure = SessionStoreError::Unavailable("down".to_string()).into();
        assert!(!failure.kind().is_known());
    }

    #[test]
    fn key_names_are_stable() {
        assert_eq!(SessionKey::UserReturnTo.as_str(), "user_return_to");
        assert_eq!(SessionKey::ReturnTo.to_string(), "return_to");
    }
}
