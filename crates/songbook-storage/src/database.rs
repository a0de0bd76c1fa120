//! SQLite connection setup and schema migrations.
//!
//! Schema changes live in `migrations/NNN_name.sql` and are listed in
//! `MIGRATIONS` in version order. `schema_migrations` records what has run.

use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use songbook_core::DatabaseLocation;
use tracing::{debug, info};

/// One numbered schema change
struct Migration {
    version: i64,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial",
    sql: include_str!("migrations/001_initial.sql"),
}];

/// SQLite database wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open a database file, creating it (and its parent directory) if
    /// needed. Pending migrations are applied.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_location(&DatabaseLocation::File(path.to_path_buf()))
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        Self::open_location(&DatabaseLocation::InMemory)
    }

    /// Open whatever the configuration points at and bring its schema up to date.
    pub fn open_location(location: &DatabaseLocation) -> Result<Self> {
        let mut conn = connect(location)?;
        let applied = apply_migrations(&mut conn, MIGRATIONS)?;
        if applied > 0 {
            info!("Applied {} migration(s) to {:?}", applied, location);
        }
        Ok(Self { conn })
    }

    /// Highest applied migration, 0 for a fresh database.
    pub fn schema_version(&self) -> i64 {
        self.conn
            .query_row(
                "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
                [],
                |row| row.get(0),
            )
            .unwrap_or(0)
    }

    /// Get a reference to the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Execute a closure within a transaction.
    pub fn transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let tx = self.conn.unchecked_transaction()?;
        let result = f(&self.conn)?;
        tx.commit()?;
        Ok(result)
    }
}

/// Connection with the pragmas every Songbook database runs under
fn connect(location: &DatabaseLocation) -> Result<Connection> {
    let conn = match location {
        DatabaseLocation::File(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create database directory: {:?}", parent)
                })?;
            }
            let conn = Connection::open(path)
                .with_context(|| format!("Failed to open database at {:?}", path))?;
            // In-memory databases cannot use WAL
            conn.pragma_update(None, "journal_mode", "WAL")?;
            conn
        }
        DatabaseLocation::InMemory => Connection::open_in_memory()?,
    };

    conn.pragma_update(None, "foreign_keys", "ON")?;
    debug!("Connected to {:?}", location);
    Ok(conn)
}

/// Apply every migration newer than the recorded schema version, each in its
/// own transaction. Returns how many ran.
fn apply_migrations(conn: &mut Connection, migrations: &[Migration]) -> Result<usize> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL
        )",
    )?;

    let current: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;

    let mut applied = 0;
    for migration in migrations.iter().filter(|m| m.version > current) {
        debug!("Running migration {:03} ({})", migration.version, migration.name);

        let tx = conn.transaction()?;
        tx.execute_batch(migration.sql).with_context(|| {
            format!("Migration {:03} ({}) failed", migration.version, migration.name)
        })?;
        tx.execute(
            "INSERT INTO schema_migrations (version, name, applied_at) VALUES (?1, ?2, datetime('now'))",
            params![migration.version, migration.name],
        )?;
        tx.commit()?;
        applied += 1;
    }

    Ok(applied)
}
