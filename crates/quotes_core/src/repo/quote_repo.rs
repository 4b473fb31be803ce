//! Quote repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide quote reads by author, by tag and in full.
//! - Own the quote + tag-link write (`add_quote_with_tags`) with atomic semantics.
//! - Own the store handle shared by every caller of one repository.
//!
//! # Invariants
//! - Connection access is serialized through a mutex; clones share one handle.
//! - All reads skip rows whose `deleted_at` is set.
//! - Reads apply no ordering; rows come back in store-native order.
//! - `add_quote_with_tags` either commits every row it wrote or none.

use crate::db::{sync_schema, DbError};
use crate::model::quote::{NewQuote, Quote, QuoteId};
use crate::repo::tag_repo::{get_or_create_tag, list_tag_names, load_tags_for_quote};
use log::{error, info};
use parking_lot::Mutex;
use rusqlite::{params, Connection, Params, Row, TransactionBehavior};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Instant;

const QUOTE_SELECT_SQL: &str = "SELECT
    q.id,
    q.text,
    q.author,
    q.created_at,
    q.updated_at,
    q.deleted_at
FROM quotes q";

pub type RepoResult<T> = Result<T, RepoError>;

/// Store handle shared between repository clones and threads.
pub type SharedConnection = Arc<Mutex<Connection>>;

/// Repository error for quote persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Store-level failure, carried unchanged from the SQLite client.
    Db(DbError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
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

/// Whether a quote query also loads each quote's tag set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagLoading {
    /// Populate `Quote::tags`.
    Eager,
    /// Leave `Quote::tags` empty.
    Skip,
}

/// Repository interface for quote/tag operations.
///
/// Every method takes `&self` so one repository can serve concurrent callers.
pub trait QuoteRepository {
    /// Lists quotes whose author equals `author` exactly.
    fn quotes_by_author(&self, author: &str, tags: TagLoading) -> RepoResult<Vec<Quote>>;
    /// Lists quotes linked to the tag named `tag_name`.
    fn quotes_by_tag(&self, tag_name: &str, tags: TagLoading) -> RepoResult<Vec<Quote>>;
    /// Lists every quote.
    fn all_quotes(&self, tags: TagLoading) -> RepoResult<Vec<Quote>>;
    /// Returns the name of every tag.
    fn tag_names(&self) -> RepoResult<Vec<String>>;
    /// Returns whether no quote is stored.
    fn is_empty(&self) -> RepoResult<bool>;
    /// Inserts one quote and links it to `tag_names`, creating missing tags,
    /// in one transaction.
    fn add_quote_with_tags(&self, quote: &NewQuote, tag_names: &[String]) -> RepoResult<QuoteId>;
}

/// SQLite-backed quote repository.
///
/// Cloning is cheap and yields a repository on the same store handle.
#[derive(Clone)]
pub struct SqliteQuoteRepository {
    conn: SharedConnection,
}

impl SqliteQuoteRepository {
    /// Takes ownership of an open connection, syncing the schema first.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        Self::try_from_shared(Arc::new(Mutex::new(conn)))
    }

    /// Builds a repository on an already shared handle, syncing the schema first.
    pub fn try_from_shared(conn: SharedConnection) -> RepoResult<Self> {
        sync_schema(&mut conn.lock())?;
        Ok(Self { conn })
    }

    /// Returns the shared store handle.
    pub fn handle(&self) -> &SharedConnection {
        &self.conn
    }
}

impl QuoteRepository for SqliteQuoteRepository {
    fn quotes_by_author(&self, author: &str, tags: TagLoading) -> RepoResult<Vec<Quote>> {
        query_quotes(
            &self.conn.lock(),
            &format!(
                "{QUOTE_SELECT_SQL}
                 WHERE q.author = ?1
                   AND q.deleted_at IS NULL;"
            ),
            params![author],
            tags,
        )
    }

    fn quotes_by_tag(&self, tag_name: &str, tags: TagLoading) -> RepoResult<Vec<Quote>> {
        query_quotes(
            &self.conn.lock(),
            &format!(
                "{QUOTE_SELECT_SQL}
                 INNER JOIN quote_tags qt ON qt.quote_id = q.id
                 INNER JOIN tags t ON t.id = qt.tag_id
                 WHERE t.name = ?1
                   AND t.deleted_at IS NULL
                   AND q.deleted_at IS NULL;"
            ),
            params![tag_name],
            tags,
        )
    }

    fn all_quotes(&self, tags: TagLoading) -> RepoResult<Vec<Quote>> {
        query_quotes(
            &self.conn.lock(),
            &format!("{QUOTE_SELECT_SQL} WHERE q.deleted_at IS NULL;"),
            params![],
            tags,
        )
    }

    fn tag_names(&self) -> RepoResult<Vec<String>> {
        list_tag_names(&self.conn.lock())
    }

    fn is_empty(&self) -> RepoResult<bool> {
        let count: i64 = self.conn.lock().query_row(
            "SELECT COUNT(*) FROM quotes WHERE deleted_at IS NULL;",
            [],
            |row| row.get(0),
        )?;
        Ok(count == 0)
    }

    fn add_quote_with_tags(&self, quote: &NewQuote, tag_names: &[String]) -> RepoResult<QuoteId> {
        let started_at = Instant::now();
        let result = insert_quote_with_tags(&mut self.conn.lock(), quote, tag_names);
        match result {
            Ok(outcome) => {
                info!(
                    "event=quote_add module=repo status=ok quote_id={} tags_total={} tags_created={} duration_ms={}",
                    outcome.quote_id,
                    tag_names.len(),
                    outcome.tags_created,
                    started_at.elapsed().as_millis()
                );
                Ok(outcome.quote_id)
            }
            Err(err) => {
                error!(
                    "event=quote_add module=repo status=error tags_total={} duration_ms={} error_code=quote_add_rolled_back error={}",
                    tag_names.len(),
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }
}

struct AddOutcome {
    quote_id: QuoteId,
    tags_created: usize,
}

fn insert_quote_with_tags(
    conn: &mut Connection,
    quote: &NewQuote,
    tag_names: &[String],
) -> RepoResult<AddOutcome> {
    // Dropping `tx` on any early return rolls the whole call back.
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    tx.execute(
        "INSERT INTO quotes (text, author) VALUES (?1, ?2);",
        params![quote.text.as_str(), quote.author.as_str()],
    )?;
    let quote_id = QuoteId(tx.last_insert_rowid());

    let mut tags_created = 0;
    let mut linked = HashSet::new();
    for name in tag_names {
        let resolution = get_or_create_tag(&tx, name.as_str())?;
        if resolution.is_created() {
            tags_created += 1;
        }
        // Repeated names in one call link once.
        if !linked.insert(resolution.tag().id) {
            continue;
        }
        tx.execute(
            "INSERT INTO quote_tags (quote_id, tag_id) VALUES (?1, ?2);",
            params![quote_id.0, resolution.tag().id.0],
        )?;
    }

    tx.commit()?;
    Ok(AddOutcome {
        quote_id,
        tags_created,
    })
}

fn query_quotes(
    conn: &Connection,
    sql: &str,
    bind_values: impl Params,
    tags: TagLoading,
) -> RepoResult<Vec<Quote>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(bind_values)?;
    let mut quotes = Vec::new();
    while let Some(row) = rows.next()? {
        let mut quote = parse_quote_row(row)?;
        if tags == TagLoading::Eager {
            quote.tags = load_tags_for_quote(conn, quote.id)?;
        }
        quotes.push(quote);
    }
    Ok(quotes)
}

fn parse_quote_row(row: &Row<'_>) -> rusqlite::Result<Quote> {
    Ok(Quote {
        id: QuoteId(row.get("id")?),
        text: row.get("text")?,
        author: row.get("author")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        deleted_at: row.get("deleted_at")?,
        tags: Vec::new(),
    })
}
