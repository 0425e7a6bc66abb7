//! SQLite connection pools for the relay's session and message tables.
//!
//! Every chat turn ends in one write transaction, while history loads and
//! status counts only read. Writes go through a single-connection pool so
//! SQLite never sees two writers; reads use a separate read-only pool that
//! WAL mode lets run alongside the writer.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

/// Schema for `chat_sessions` and `chat_messages`.
static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Read connections kept open for history and status queries.
const READER_CONNECTIONS: u32 = 8;

/// How long a connection waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Reader and writer pools over one database file.
#[derive(Clone)]
pub struct DatabasePool {
    /// Read-only connections.
    pub reader: SqlitePool,
    /// The only connection allowed to write.
    pub writer: SqlitePool,
}

impl DatabasePool {
    /// Open (creating if needed) the database at `database_url` and bring its
    /// schema up to date before any reader connects.
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let options = connect_options(database_url)?;

        let writer = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options.clone())
            .await?;
        MIGRATOR.run(&writer).await?;

        let reader = SqlitePoolOptions::new()
            .max_connections(READER_CONNECTIONS)
            .connect_with(options.read_only(true))
            .await?;

        tracing::debug!(
            url = %database_url,
            readers = READER_CONNECTIONS,
            "Chat store opened"
        );
        Ok(Self { reader, writer })
    }

    /// Close both pools, waiting for in-flight queries to finish.
    pub async fn close(&self) {
        self.writer.close().await;
        self.reader.close().await;
    }
}

/// Connection settings shared by both pools: WAL journal, enforced foreign
/// keys (messages must reference an existing session) and a busy timeout.
fn connect_options(database_url: &str) -> Result<SqliteConnectOptions, sqlx::Error> {
    Ok(SqliteConnectOptions::from_str(database_url)?
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(BUSY_TIMEOUT)
        .create_if_missing(true))
}

/// Database URL for `{data_dir}/chatrelay.db`.
pub fn default_database_url(data_dir: &Path) -> String {
    format!(
        "sqlite://{}?mode=rwc",
        data_dir.join("chatrelay.db").display()
    )
}
