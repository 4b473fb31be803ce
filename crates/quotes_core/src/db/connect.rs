//! Connection bootstrap for SQLite with a bounded retry loop.
//!
//! # Responsibility
//! - Open file, URI or in-memory SQLite connections.
//! - Configure connection pragmas required by core behavior.
//! - Wait for the store with a fixed backoff, then give up.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON` and answered a liveness check.
//! - At most `ConnectPolicy::max_attempts` opens are tried; no jitter, no growth.

use super::{DbError, DbResult};
use log::{error, info, warn};
use rusqlite::Connection;
use std::thread;
use std::time::{Duration, Instant};

const DEFAULT_MAX_ATTEMPTS: u32 = 11;
const DEFAULT_BACKOFF: Duration = Duration::from_secs(2);
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Bound and pacing of the startup connection wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectPolicy {
    /// Total open attempts, including the first one.
    pub max_attempts: u32,
    /// Fixed sleep between two failed attempts.
    pub backoff: Duration,
}

impl Default for ConnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff: DEFAULT_BACKOFF,
        }
    }
}

/// Opens the store named by `dsn` using the default policy (11 attempts, 2s apart).
///
/// `dsn` is a database file path, `:memory:`, or a SQLite `file:` URI.
pub fn connect(dsn: &str) -> DbResult<Connection> {
    connect_with_policy(dsn, &ConnectPolicy::default())
}

/// Opens the store named by `dsn`, retrying according to `policy`.
///
/// # Errors
/// - `DbError::ConnectRetriesExhausted` once every attempt failed.
///
/// # Side effects
/// - Sleeps the calling thread between failed attempts.
/// - Emits `db_connect` logging events per attempt.
pub fn connect_with_policy(dsn: &str, policy: &ConnectPolicy) -> DbResult<Connection> {
    retry_open(policy, || open_ready(dsn))
}

/// Opens a configured in-memory connection without retrying.
pub fn open_in_memory() -> DbResult<Connection> {
    let conn = Connection::open_in_memory()?;
    configure_connection(&conn)?;
    Ok(conn)
}

fn retry_open<F>(policy: &ConnectPolicy, mut open: F) -> DbResult<Connection>
where
    F: FnMut() -> rusqlite::Result<Connection>,
{
    let started_at = Instant::now();
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        match open() {
            Ok(conn) => {
                info!(
                    "event=db_connect module=db status=ok attempt={} duration_ms={}",
                    attempt,
                    started_at.elapsed().as_millis()
                );
                return Ok(conn);
            }
            Err(err) if attempt >= max_attempts => {
                error!(
                    "event=db_connect module=db status=error attempt={} duration_ms={} error_code=db_connect_exhausted error={}",
                    attempt,
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(DbError::ConnectRetriesExhausted {
                    attempts: attempt,
                    last: err,
                });
            }
            Err(err) => {
                warn!(
                    "event=db_connect module=db status=not_ready attempt={} backoff_ms={} error={}",
                    attempt,
                    policy.backoff.as_millis(),
                    err
                );
                thread::sleep(policy.backoff);
            }
        }
    }
}

fn open_ready(dsn: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(dsn)?;
    configure_connection(&conn)?;
    Ok(conn)
}

fn configure_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    conn.query_row("SELECT 1;", [], |row| row.get::<_, i64>(0))?;
    Ok(())
}
