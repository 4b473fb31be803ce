//! SQLite migration registry and schema sync.
//!
//! # Responsibility
//! - Register schema migrations in strictly increasing order.
//! - Bring `quotes`, `tags` and `quote_tags` up to date atomically.
//!
//! # Invariants
//! - `version` values must remain monotonic.
//! - Applied migration version is mirrored to `PRAGMA user_version`.
//! - Sync is idempotent and safe to run on every process start.

use crate::db::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::time::Instant;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("0001_quotes.sql"),
}];

/// Returns the latest migration version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Ensures the quote, tag and association tables exist on `conn`.
///
/// # Errors
/// - `DbError::UnsupportedSchemaVersion` when the database is newer than this binary.
/// - `DbError::Sqlite` when the backend rejects schema creation.
///
/// # Side effects
/// - Emits `schema_sync` logging events with versions and duration.
pub fn sync_schema(conn: &mut Connection) -> DbResult<()> {
    let started_at = Instant::now();
    match apply_migrations(conn) {
        Ok((from, to)) => {
            info!(
                "event=schema_sync module=db status=ok from_version={} to_version={} duration_ms={}",
                from,
                to,
                started_at.elapsed().as_millis()
            );
            Ok(())
        }
        Err(err) => {
            error!(
                "event=schema_sync module=db status=error duration_ms={} error_code=schema_sync_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn apply_migrations(conn: &mut Connection) -> DbResult<(u32, u32)> {
    let current_version = current_user_version(conn)?;
    let latest = latest_version();

    if current_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }

    if current_version == latest {
        return Ok((current_version, latest));
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS {
        if migration.version <= current_version {
            continue;
        }

        tx.execute_batch(migration.sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
    }
    tx.commit()?;

    Ok((current_version, latest))
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
