//! SQLite message store implementation.
//!
//! Implements `MessageRepository` from `chatrelay-core`. Rows are ordered by
//! their autoincrement id, which is the write order. Every write goes through
//! the single-connection writer pool.

use chatrelay_core::repository::message::MessageRepository;
use chatrelay_types::chat::{ChatMessage, MessageRole};
use chatrelay_types::error::RepositoryError;
use chrono::Utc;
use sqlx::Row;
use sqlx::sqlite::SqliteConnection;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime};

/// SQLite-backed implementation of `MessageRepository`.
pub struct SqliteMessageRepository {
    pool: DatabasePool,
}

impl SqliteMessageRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain ChatMessage.
struct ChatMessageRow {
    id: i64,
    session_id: String,
    role: String,
    content: String,
    created_at: String,
}

impl ChatMessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            session_id: row.try_get("session_id")?,
            role: row.try_get("role")?,
            content: row.try_get("content")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_message(self) -> Result<ChatMessage, RepositoryError> {
        let role = MessageRole::from_stored(&self.role).map_err(RepositoryError::Query)?;
        Ok(ChatMessage {
            id: self.id,
            session_id: self.session_id,
            role,
            content: self.content,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

/// Insert one message on `conn` and return the stored record.
async fn insert_message(
    conn: &mut SqliteConnection,
    session_id: &str,
    role: MessageRole,
    content: &str,
) -> Result<ChatMessage, RepositoryError> {
    let created_at = Utc::now();
    let result = sqlx::query(
        r#"INSERT INTO chat_messages (session_id, role, content, created_at)
           VALUES (?, ?, ?, ?)"#,
    )
    .bind(session_id)
    .bind(role.as_stored())
    .bind(content)
    .bind(format_datetime(&created_at))
    .execute(&mut *conn)
    .await
    .map_err(|e| RepositoryError::Query(e.to_string()))?;

    Ok(ChatMessage {
        id: result.last_insert_rowid(),
        session_id: session_id.to_string(),
        role,
        content: content.to_string(),
        created_at,
    })
}

impl MessageRepository for SqliteMessageRepository {
    async fn append(
        &self,
        session_id: &str,
        role: MessageRole,
        content: &str,
    ) -> Result<ChatMessage, RepositoryError> {
        let mut conn = self
            .pool
            .writer
            .acquire()
            .await
            .map_err(|_| RepositoryError::Connection)?;

        insert_message(&mut conn, session_id, role, content).await
    }

    async fn append_exchange(
        &self,
        session_id: &str,
        user_content: &str,
        reply_content: &str,
    ) -> Result<(ChatMessage, ChatMessage), RepositoryError> {
        let mut tx = self
            .pool
            .writer
            .begin()
            .await
            .map_err(|_| RepositoryError::Connection)?;

        // Dropping `tx` on an early return rolls both inserts back.
        let user = insert_message(&mut tx, session_id, MessageRole::User, user_content).await?;
        let reply =
            insert_message(&mut tx, session_id, MessageRole::Assistant, reply_content).await?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok((user, reply))
    }

    async fn list_by_session(&self, session_id: &str) -> Result<Vec<ChatMessage>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM chat_messages WHERE session_id = ? ORDER BY id ASC")
            .bind(session_id)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            let msg_row = ChatMessageRow::from_row(row)
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            messages.push(msg_row.into_message()?);
        }

        Ok(messages)
    }

    async fn count_messages(&self) -> Result<u64, RepositoryError> {
        let row = sqlx::query("SELECT COUNT(*) as cnt FROM chat_messages")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let count: i64 = row
            .try_get("cnt")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(count as u64)
    }
}
