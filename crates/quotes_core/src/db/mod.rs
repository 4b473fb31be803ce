//! SQLite storage bootstrap and schema sync entry points.
//!
//! # Responsibility
//! - Acquire SQLite connections for the quotes store, retrying on failure.
//! - Apply schema migrations in deterministic order.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Core code must not read/write quote data before schema sync succeeds.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod connect;
pub mod migrations;

pub use connect::{connect, connect_with_policy, open_in_memory, ConnectPolicy};
pub use migrations::sync_schema;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    ConnectRetriesExhausted {
        attempts: u32,
        last: rusqlite::Error,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::ConnectRetriesExhausted { attempts, last } => {
                write!(f, "gave up connecting after {attempts} attempts: {last}")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
            Self::ConnectRetriesExhausted { last, .. } => Some(last),
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
