//! In-memory session store for testing and single-server deployments.
//!
//! Entries expire after the configured time-to-live. An expired entry is
//! dropped when it is read, and every `SWEEP_INTERVAL` writes the whole map
//! is swept so entries that are never read again do not accumulate.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::SessionId;
use crate::ports::{SessionKey, SessionStore, SessionStoreError};

use super::entry_key;

/// Writes between two sweeps of expired entries.
pub const SWEEP_INTERVAL: usize = 256;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| now < at)
    }
}

/// In-memory session store.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
    ttl: Option<Duration>,
    writes: Arc<AtomicUsize>,
}

impl InMemorySessionStore {
    /// Creates a store whose entries never expire.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how long an entry lives after it was last written.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Number of live entries across all sessions.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|e| e.is_live(now))
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drops every expired entry and returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, e| e.is_live(now));
        let removed = before - entries.len();
        if removed > 0 {
            tracing::debug!(removed, remaining = entries.len(), "Purged expired session entries");
        }
        removed
    }

    #[cfg(test)]
    async fn stored_len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn remember(
        &self,
        session: &SessionId,
        key: SessionKey,
        value: &str,
    ) -> Result<(), SessionStoreError> {
        let written = self.writes.fetch_add(1, Ordering::Relaxed) + 1;
        if self.ttl.is_some() && written % SWEEP_INTERVAL == 0 {
            self.purge_expired().await;
        }

        let entry = Entry {
            value: value.to_string(),
            expires_at: self.ttl.map(|ttl| Instant::now() + ttl),
        };
        self.entries
            .write()
            .await
            .insert(entry_key(session, key), entry);
        Ok(())
    }

    async fn recall(
        &self,
        session: &SessionId,
        key: SessionKey,
    ) -> Result<Option<String>, SessionStoreError> {
        let storage_key = entry_key(session, key);
        let now = Instant::now();

        let found = self.entries.read().await.get(&storage_key).cloned();
        match found {
            Some(entry) if entry.is_live(now) => Ok(Some(entry.value)),
            Some(_) => {
                self.entries.write().await.remove(&storage_key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn forget(&self, session: &SessionId, key: SessionKey) -> Result<(), SessionStoreError> {
        self.entries.write().await.remove(&entry_key(session, key));
        Ok(())
    }
}
