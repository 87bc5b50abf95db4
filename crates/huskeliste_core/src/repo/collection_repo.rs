//! Collection repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist the full collection as one JSON value under a fixed key.
//! - Keep SQL and encoding details inside the persistence boundary.
//!
//! # Invariants
//! - `save` replaces the stored value wholesale.
//! - `load` returns `Ok(None)` for an absent value and
//!   `Err(RepoError::InvalidData)` for one that does not parse.
//! - The JSON encoding is structurally lossless: list order, item order
//!   and numeric ids survive a round trip.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::collection::Collection;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Fixed device-store key holding the serialized collection.
pub const STORAGE_KEY: &str = "lists";

const KV_TABLE: &str = "kv_store";
const KV_COLUMNS: [&str; 3] = ["key", "value", "updated_at"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for collection persistence operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    Encode(serde_json::Error),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode collection: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted collection: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection not migrated: user_version {actual_version}, expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence gateway interface for the single stored collection.
pub trait CollectionRepository {
    /// Reads the persisted collection. `Ok(None)` when nothing is stored.
    fn load(&self) -> RepoResult<Option<Collection>>;
    /// Writes the full collection under the fixed key.
    fn save(&self, collection: &Collection) -> RepoResult<()>;
}

/// SQLite-backed collection repository.
pub struct SqliteCollectionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCollectionRepository<'conn> {
    /// Constructs a repository from a migrated, ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl CollectionRepository for SqliteCollectionRepository<'_> {
    fn load(&self) -> RepoResult<Option<Collection>> {
        let stored: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [STORAGE_KEY],
                |row| row.get(0),
            )
            .optional()?;

        match stored {
            Some(raw) => {
                let collection = serde_json::from_str(&raw).map_err(|err| {
                    RepoError::InvalidData(format!(
                        "value under key `{STORAGE_KEY}` does not parse: {err}"
                    ))
                })?;
                Ok(Some(collection))
            }
            None => Ok(None),
        }
    }

    fn save(&self, collection: &Collection) -> RepoResult<()> {
        let encoded = serde_json::to_string(collection).map_err(RepoError::Encode)?;
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![STORAGE_KEY, encoded],
        )?;
        Ok(())
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected = latest_version();
    let actual = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    if actual < expected {
        return Err(RepoError::UninitializedConnection {
            expected_version: expected,
            actual_version: actual,
        });
    }

    if !table_exists(conn, KV_TABLE)? {
        return Err(RepoError::MissingRequiredTable(KV_TABLE));
    }

    for column in KV_COLUMNS {
        if !column_exists(conn, KV_TABLE, column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: KV_TABLE,
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn column_exists(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM pragma_table_info(?1) WHERE name = ?2
        );",
        [table, column],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
