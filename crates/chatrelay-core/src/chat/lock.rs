//! Per-session mutual exclusion for chat turns.
//!
//! Two chat requests for the same session must not interleave their
//! read-history / complete / append steps. `SessionLocks` hands out one
//! async mutex per external session id, backed by a `DashMap`. The map guard
//! is dropped before the mutex is awaited -- never hold a `DashMap` guard
//! across await.
//!
//! Entries live only while someone holds or waits on them: releasing the last
//! [`SessionGuard`] for a session removes its entry, so the table stays sized
//! to the number of in-flight turns.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

type LockTable = DashMap<String, Arc<Mutex<()>>>;

/// Lock table keyed by external session id.
#[derive(Clone, Default)]
pub struct SessionLocks {
    inner: Arc<LockTable>,
}

/// Exclusive access to one session. Dropping it releases the lock and evicts
/// the table entry when no other task is waiting on it.
pub struct SessionGuard {
    guard: Option<OwnedMutexGuard<()>>,
    session_id: String,
    table: Arc<LockTable>,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        // The owned guard keeps its own Arc to the mutex; release it first so
        // the count below only sees the table and any queued waiters.
        drop(self.guard.take());
        self.table
            .remove_if(&self.session_id, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `session_id`. Released when the guard drops.
    pub async fn acquire(&self, session_id: &str) -> SessionGuard {
        let mutex = self
            .inner
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let guard = mutex.lock_owned().await;
        SessionGuard {
            guard: Some(guard),
            session_id: session_id.to_string(),
            table: Arc::clone(&self.inner),
        }
    }

    /// Number of sessions currently held or waited on.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_session_is_exclusive() {
        let locks = SessionLocks::new();
        let guard = locks.acquire("abc").await;

        let contender = locks.clone();
        let waiting = tokio::spawn(async move {
            let _g = contender.acquire("abc").await;
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiting.is_finished());

        drop(guard);
        waiting.await.unwrap();
    }

    #[tokio::test]
    async fn test_different_sessions_do_not_block() {
        let locks = SessionLocks::new();
        let _a = locks.acquire("a").await;
        let acquired = tokio::time::timeout(Duration::from_millis(100), locks.acquire("b")).await;
        assert!(acquired.is_ok());
        assert_eq!(locks.len(), 2);
    }

    #[tokio::test]
    async fn test_released_sessions_leave_no_entries() {
        let locks = SessionLocks::new();
        for i in 0..1000 {
            let _g = locks.acquire(&format!("session-{i}")).await;
            assert_eq!(locks.len(), 1);
        }
        assert_eq!(locks.len(), 0);
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn test_entry_survives_while_a_waiter_is_queued() {
        let locks = SessionLocks::new();
        let first = locks.acquire("abc").await;

        let contender = locks.clone();
        let waiting = tokio::spawn(async move {
            let _g = contender.acquire("abc").await;
        });
        tokio::time::sleep(Duration::from_millis(20)).await;

        // The queued waiter still references the mutex, so the entry stays.
        drop(first);
        assert_eq!(locks.len(), 1);

        waiting.await.unwrap();
        assert!(locks.is_empty());
    }
}
