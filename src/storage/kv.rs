//! String key/value persistence
//!
//! The recipe store only needs `get`/`set` on strings. `SqliteKeyValueStore`
//! backs that with a single table and writes through on every `set`.

use anyhow::Context;
use rusqlite::{params, Connection, OptionalExtension};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub const PREFS_FILE_NAME: &str = "recipebook_prefs.sqlite";

/// Synchronous string key/value namespace. Writes are durable once `set` returns.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
}

pub struct SqliteKeyValueStore {
    conn: Mutex<Connection>,
    db_path: Option<PathBuf>,
}

impl SqliteKeyValueStore {
    /// Open (or create) the preferences database under `base_path`.
    pub fn open(base_path: &str) -> anyhow::Result<Self> {
        let dir = Path::new(base_path);
        if !dir.exists() {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating storage directory {:?}", dir))?;
        }
        let db_path = dir.join(PREFS_FILE_NAME);
        let conn = Connection::open(&db_path)
            .with_context(|| format!("opening database at {:?}", db_path))?;
        Self::init_schema(&conn)?;
        tracing::debug!("Opened preferences store at {}", db_path.display());

        Ok(Self {
            conn: Mutex::new(conn),
            db_path: Some(db_path),
        })
    }

    /// Non-durable store, handy for tests and previews.
    pub fn in_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory().context("opening in-memory database")?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            db_path: None,
        })
    }

    fn init_schema(conn: &Connection) -> anyhow::Result<()> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS preferences (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            ",
        )
        .context("creating preferences table")
    }

    fn lock(&self) -> anyhow::Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| anyhow::anyhow!("lock poisoned: {}", e))
    }

    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let conn = self.lock()?;
        conn.query_row(
            "SELECT value FROM preferences WHERE key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        )
        .optional()
        .with_context(|| format!("reading preference {key}"))
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO preferences (key, value) VALUES (?1, ?2)",
            params![key, value],
        )
        .with_context(|| format!("writing preference {key}"))?;
        Ok(())
    }
}
