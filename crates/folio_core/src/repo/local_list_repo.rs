//! Client-local list storage backed by SQLite.
//!
//! # Responsibility
//! - Store named JSON arrays (`projects`, `certificates`, ...) the way a
//!   browser keeps them in local storage.
//! - Answer "how many items are stored under key" for display counters.
//!
//! # Invariants
//! - A key that was never written reads as an empty list.
//! - Stored payloads are always JSON arrays; anything else is `InvalidData`.
//! - Keys match `^[a-z][a-z0-9_]{0,63}$`.

use crate::db::DbError;
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const PROJECTS_KEY: &str = "projects";
pub const CERTIFICATES_KEY: &str = "certificates";

static LIST_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9_]{0,63}$").expect("valid list key regex"));

pub type RepoResult<T> = Result<T, RepoError>;

/// Local store error.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    InvalidKey(String),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidKey(key) => write!(f, "invalid local list key `{key}`"),
            Self::InvalidData(message) => write!(f, "invalid stored list data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidKey(_) | Self::InvalidData(_) => None,
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

/// Named-list storage contract.
pub trait LocalListStore {
    /// Returns the raw items stored under `key` (empty when absent).
    fn read_list(&self, key: &str) -> RepoResult<Vec<Value>>;
    /// Replaces the list stored under `key`.
    fn write_list(&self, key: &str, items: &[Value]) -> RepoResult<()>;

    /// Number of items stored under `key`.
    fn list_len(&self, key: &str) -> RepoResult<usize> {
        self.read_list(key).map(|items| items.len())
    }

    /// Decodes every stored item as `T`, failing on the first bad entry.
    fn read_typed<T: DeserializeOwned>(&self, key: &str) -> RepoResult<Vec<T>>
    where
        Self: Sized,
    {
        self.read_list(key)?
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                serde_json::from_value(item).map_err(|err| {
                    RepoError::InvalidData(format!("`{key}` item {index} does not decode: {err}"))
                })
            })
            .collect()
    }

    /// Serializes `items` and replaces the list under `key`.
    fn write_typed<T: Serialize>(&self, key: &str, items: &[T]) -> RepoResult<()>
    where
        Self: Sized,
    {
        let values = items
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| RepoError::InvalidData(format!("`{key}` item does not encode: {err}")))?;
        self.write_list(key, &values)
    }
}

/// SQLite-backed local list store.
pub struct SqliteLocalListRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteLocalListRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl LocalListStore for SqliteLocalListRepository<'_> {
    fn read_list(&self, key: &str) -> RepoResult<Vec<Value>> {
        let key = validate_key(key)?;
        let payload: Option<String> = self
            .conn
            .query_row(
                "SELECT payload FROM local_lists WHERE key = ?1;",
                [key],
                |row| row.get(0),
            )
            .optional()?;

        match payload {
            None => Ok(Vec::new()),
            Some(raw) => match serde_json::from_str::<Value>(&raw) {
                Ok(Value::Array(items)) => Ok(items),
                Ok(_) => Err(RepoError::InvalidData(format!(
                    "`{key}` payload is not a JSON array"
                ))),
                Err(err) => Err(RepoError::InvalidData(format!(
                    "`{key}` payload is not valid JSON: {err}"
                ))),
            },
        }
    }

    fn write_list(&self, key: &str, items: &[Value]) -> RepoResult<()> {
        let key = validate_key(key)?;
        let payload = serde_json::to_string(items)
            .map_err(|err| RepoError::InvalidData(format!("`{key}` payload: {err}")))?;
        self.conn.execute(
            "INSERT INTO local_lists (key, payload) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, payload],
        )?;
        Ok(())
    }
}

fn validate_key(key: &str) -> RepoResult<&str> {
    let trimmed = key.trim();
    if LIST_KEY_RE.is_match(trimmed) {
        Ok(trimmed)
    } else {
        Err(RepoError::InvalidKey(trimmed.to_string()))
    }
}
