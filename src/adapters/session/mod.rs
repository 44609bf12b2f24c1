//! Session store adapters.
//!
//! - `InMemorySessionStore` - Single-process store for tests and development
//! - `RedisSessionStore` - Shared store for multi-server deployments

mod in_memory;
mod redis;

pub use in_memory::InMemorySessionStore;
pub use redis::RedisSessionStore;

use crate::domain::foundation::SessionId;
use crate::ports::SessionKey;

/// Storage key for one session entry.
pub(crate) fn entry_key(session: &SessionId, key: SessionKey) -> String {
    format!("session:{}:{}", session, key.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn entry_key_is_namespaced_by_session() {
        let session = SessionId::from_uuid(Uuid::nil());
        assert_eq!(
            entry_key(&session, SessionKey::UserReturnTo),
            "session:00000000-0000-0000-0000-000000000000:user_return_to"
        );
    }
}
