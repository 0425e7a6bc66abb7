//! SQLite session registry implementation.
//!
//! Implements `SessionRepository` from `chatrelay-core`. Creation relies on the
//! UNIQUE constraint on `chat_sessions.session_id`: the insert is a no-op when
//! the id already exists, so racing creators all end up with the same row.

use chatrelay_core::repository::session::SessionRepository;
use chatrelay_types::chat::ChatSession;
use chatrelay_types::error::RepositoryError;
use chrono::Utc;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime};

/// SQLite-backed implementation of `SessionRepository`.
pub struct SqliteSessionRepository {
    pool: DatabasePool,
}

impl SqliteSessionRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain ChatSession.
struct ChatSessionRow {
    id: i64,
    session_id: String,
    created_at: String,
}

impl ChatSessionRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            session_id: row.try_get("session_id")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_session(self) -> Result<ChatSession, RepositoryError> {
        Ok(ChatSession {
            id: self.id,
            session_id: self.session_id,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

fn map_session_row(row: &sqlx::sqlite::SqliteRow) -> Result<ChatSession, RepositoryError> {
    ChatSessionRow::from_row(row)
        .map_err(|e| RepositoryError::Query(e.to_string()))?
        .into_session()
}

impl SessionRepository for SqliteSessionRepository {
    async fn ensure_session(&self, session_id: &str) -> Result<ChatSession, RepositoryError> {
        let inserted = sqlx::query(
            r#"INSERT INTO chat_sessions (session_id, created_at)
               VALUES (?, ?)
               ON CONFLICT(session_id) DO NOTHING"#,
        )
        .bind(session_id)
        .bind(format_datetime(&Utc::now()))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if inserted.rows_affected() > 0 {
            tracing::info!(session_id = %session_id, "Created session");
        }

        // Read back on the writer, the connection that just wrote the row.
        let row = sqlx::query("SELECT * FROM chat_sessions WHERE session_id = ?")
            .bind(session_id)
            .fetch_optional(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?
            .ok_or(RepositoryError::NotFound)?;

        map_session_row(&row)
    }

    async fn exists(&self, session_id: &str) -> Result<bool, RepositoryError> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM chat_sessions WHERE session_id = ?) AS found")
            .bind(session_id)
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let found: i64 = row
            .try_get("found")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(found != 0)
    }

    async fn get_session(&self, session_id: &str) -> Result<Option<ChatSession>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM chat_sessions WHERE session_id = ?")
            .bind(session_id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.as_ref().map(map_session_row).transpose()
    }

    async fn count_sessions(&self) -> Result<u64, RepositoryError> {
        let row = sqlx::query("SELECT COUNT(*) as cnt FROM chat_sessions")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let count: i64 = row
            .try_get("cnt")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::{default_database_url, DatabasePool};
    use std::sync::Arc;

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let url = default_database_url(dir.path());
        // Leak tempdir so it lives for the test
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    #[tokio::test]
    async fn test_ensure_session_creates_then_returns_existing() {
        let repo = SqliteSessionRepository::new(test_pool().await);

        let first = repo.ensure_session("abc123").await.unwrap();
        let second = repo.ensure_session("abc123").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.session_id, "abc123");
        assert_eq!(repo.count_sessions().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_exists_has_no_side_effects() {
        let repo = SqliteSessionRepository::new(test_pool().await);

        assert!(!repo.exists("ghost").await.unwrap());
        assert!(!repo.exists("ghost").await.unwrap());
        assert_eq!(repo.count_sessions().await.unwrap(), 0);

        repo.ensure_session("ghost").await.unwrap();
        assert!(repo.exists("ghost").await.unwrap());
    }

    #[tokio::test]
    async fn test_get_session() {
        let repo = SqliteSessionRepository::new(test_pool().await);

        assert!(repo.get_session("s").await.unwrap().is_none());
        let created = repo.ensure_session("s").await.unwrap();
        let found = repo.get_session("s").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_concurrent_ensure_creates_one_row() {
        let repo = Arc::new(SqliteSessionRepository::new(test_pool().await));

        let mut handles = Vec::new();
        for _ in 0..10 {
            let repo = Arc::clone(&repo);
            handles.push(tokio::spawn(async move {
                repo.ensure_session("race").await
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap().id);
        }
        ids.dedup();
        assert_eq!(ids.len(), 1);
        assert_eq!(repo.count_sessions().await.unwrap(), 1);
    }
}
