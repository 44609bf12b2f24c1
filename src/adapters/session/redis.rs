//! Redis-backed session store for multi-server deployments.
//!
//! Each entry is a plain string key `{prefix}:session:{id}:{key}` written
//! with `SET .. EX` so abandoned sessions expire on their own.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use crate::domain::foundation::SessionId;
use crate::ports::{SessionKey, SessionStore, SessionStoreError};

use super::entry_key;

/// Redis-backed session store.
#[derive(Clone)]
pub struct RedisSessionStore {
    conn: MultiplexedConnection,
    ttl_secs: u64,
    key_prefix: String,
}

impl RedisSessionStore {
    pub fn new(conn: MultiplexedConnection, ttl_secs: u64) -> Self {
        Self {
            conn,
            ttl_secs: ttl_secs.max(1),
            key_prefix: String::new(),
        }
    }

    /// Namespaces every key under `prefix`.
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    fn key(&self, session: &SessionId, key: SessionKey) -> String {
        prefixed_key(&self.key_prefix, session, key)
    }
}

fn prefixed_key(prefix: &str, session: &SessionId, key: SessionKey) -> String {
    if prefix.is_empty() {
        entry_key(session, key)
    } else {
        format!("{}:{}", prefix, entry_key(session, key))
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn remember(
        &self,
        session: &SessionId,
        key: SessionKey,
        value: &str,
    ) -> Result<(), SessionStoreError> {
        let mut conn = self.conn.clone();

        redis::cmd("SET")
            .arg(self.key(session, key))
            .arg(value)
            .arg("EX")
            .arg(self.ttl_secs)
            .query_async::<_, ()>(&mut conn)
            .await
            .map_err(|e: redis::RedisError| SessionStoreError::Unavailable(e.to_string()))?;

        Ok(())
    }

    async fn recall(
        &self,
        session: &SessionId,
        key: SessionKey,
    ) -> Result<Option<String>, SessionStoreError> {
        let mut conn = self.conn.clone();

        let value: Option<String> = conn
            .get(self.key(session, key))
            .await
            .map_err(|e: redis::RedisError| SessionStoreError::Unavailable(e.to_string()))?;

        Ok(value)
    }

    async fn forget(&self, session: &SessionId, key: SessionKey) -> Result<(), SessionStoreError> {
        let mut conn = self.conn.clone();

        conn.del::<_, ()>(self.key(session, key))
            .await
            .map_err(|e: redis::RedisError| SessionStoreError::Unavailable(e.to_string()))?;

        Ok(())
    }

    async fn take(
        &self,
        session: &SessionId,
        key: SessionKey,
    ) -> Result<Option<String>, SessionStoreError> {
        let mut conn = self.conn.clone();

        let value: Option<String> = redis::cmd("GETDEL")
            .arg(self.key(session, key))
            .query_async(&mut conn)
            .await
            .map_err(|e: redis::RedisError| SessionStoreError::Unavailable(e.to_string()))?;

        Ok(value)
    }
}

impl std::fmt::Debug for RedisSessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisSessionStore")
            .field("ttl_secs", &self.ttl_secs)
            .field("key_prefix", &self.key_prefix)
            .finish_non_exhaustive()
    }
}
