//! `SQLite` episode store.
//!
//! The `memories` table is shared with the retrieval engine that later embeds,
//! decays and recalls these rows. The importer only appends episodes.

use std::fs;

use rusqlite::{Connection, Transaction};
use tracing::debug;

use crate::memory::core::config::StorageConfig;
use crate::memory::core::errors::{MemoryError, MemoryResult};
use crate::memory::core::kinds::MemoryKind;

/// Name of the shared memory table.
pub const MEMORY_TABLE: &str = "memories";

/// Initial strength of a freshly imported episode.
pub const INITIAL_STRENGTH: f64 = 1.0;

/// Destination for accepted episodes.
pub trait EpisodeSink {
    /// Append one episode created at `created_at` (ISO-8601 UTC).
    ///
    /// # Errors
    /// Returns an error if the episode cannot be stored.
    fn insert_episode(&mut self, body: &str, created_at: &str) -> MemoryResult<()>;
}

/// Create the memory table and its indexes if missing.
///
/// # Errors
/// Returns an error if the schema statements fail.
pub fn ensure_schema(conn: &Connection) -> MemoryResult<()> {
    conn.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS {MEMORY_TABLE} (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            kind             TEXT NOT NULL CHECK(kind IN ('fact', 'episode')),
            subject          TEXT,
            relation         TEXT,
            object           TEXT,
            episode_text     TEXT,
            strength         REAL NOT NULL DEFAULT 1.0,
            embedding        BLOB,
            created_at       TEXT NOT NULL,
            last_accessed_at TEXT NOT NULL,
            access_count     INTEGER NOT NULL DEFAULT 0
        );
        CREATE INDEX IF NOT EXISTS idx_{MEMORY_TABLE}_subject ON {MEMORY_TABLE}(subject);
        CREATE INDEX IF NOT EXISTS idx_{MEMORY_TABLE}_kind ON {MEMORY_TABLE}(kind);"
    ))?;
    Ok(())
}

/// Owner of the store connection for one import run.
pub struct EpisodeStore {
    conn: Connection,
}

impl EpisodeStore {
    /// Open (or create) the store file, creating its parent directory.
    ///
    /// # Errors
    /// Returns an error if the directory or database cannot be created.
    pub fn open(config: &StorageConfig) -> MemoryResult<Self> {
        if let Some(parent) = config.sqlite_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(&config.sqlite_path)?;
        debug!(path = %config.sqlite_path.display(), "opened memory store");
        Ok(Self { conn })
    }

    /// Open a throwaway in-memory store.
    ///
    /// # Errors
    /// Returns an error if `SQLite` cannot allocate the database.
    pub fn open_in_memory() -> MemoryResult<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    /// Create the schema if missing; safe to call on every run.
    ///
    /// # Errors
    /// Returns an error if the schema statements fail.
    pub fn ensure_schema(&self) -> MemoryResult<()> {
        ensure_schema(&self.conn)
    }

    /// Start the run's transaction. Nothing is visible until [`EpisodeWriter::commit`].
    ///
    /// # Errors
    /// Returns an error if the transaction cannot be started.
    pub fn begin(&mut self) -> MemoryResult<EpisodeWriter<'_>> {
        Ok(EpisodeWriter {
            tx: self.conn.transaction()?,
            inserted: 0,
        })
    }

    /// Count rows of one kind.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn count_by_kind(&self, kind: MemoryKind) -> MemoryResult<u64> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {MEMORY_TABLE} WHERE kind = ?1"),
            rusqlite::params![kind.as_str()],
            |row| row.get(0),
        )?;
        to_count(count)
    }

    /// Count rows still waiting for an embedding.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn count_missing_embeddings(&self) -> MemoryResult<u64> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {MEMORY_TABLE} WHERE embedding IS NULL"),
            [],
            |row| row.get(0),
        )?;
        to_count(count)
    }

    /// Borrow the underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }
}

/// Transactional writer for one import run.
///
/// Dropping the writer without committing rolls back every insert.
pub struct EpisodeWriter<'conn> {
    tx: Transaction<'conn>,
    inserted: u64,
}

impl EpisodeWriter<'_> {
    /// Number of rows inserted so far in this transaction.
    #[must_use]
    pub const fn inserted(&self) -> u64 {
        self.inserted
    }

    /// Commit every insert of the run.
    ///
    /// # Errors
    /// Returns an error if the commit fails; the run is then rolled back.
    pub fn commit(self) -> MemoryResult<u64> {
        let inserted = self.inserted;
        self.tx.commit()?;
        debug!(inserted, "committed import transaction");
        Ok(inserted)
    }
}

impl EpisodeSink for EpisodeWriter<'_> {
    fn insert_episode(&mut self, body: &str, created_at: &str) -> MemoryResult<()> {
        if body.trim().is_empty() {
            return Err(MemoryError::InvalidEpisode(
                "episode_text must not be empty".to_string(),
            ));
        }

        let mut stmt = self.tx.prepare_cached(&format!(
            "INSERT INTO {MEMORY_TABLE}
            (kind, episode_text, strength, embedding, created_at, last_accessed_at, access_count)
            VALUES (?1, ?2, ?3, NULL, ?4, ?4, 0)"
        ))?;
        stmt.execute(rusqlite::params![
            MemoryKind::Episode.as_str(),
            body,
            INITIAL_STRENGTH,
            created_at
        ])?;
        self.inserted += 1;
        Ok(())
    }
}

fn to_count(count: i64) -> MemoryResult<u64> {
    u64::try_from(count).map_err(|_| MemoryError::InvalidEpisode(format!("invalid row count {count}")))
}
