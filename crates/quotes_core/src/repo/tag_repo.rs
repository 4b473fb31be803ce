//! Tag lookups and get-or-create helpers.
//!
//! # Responsibility
//! - Resolve tag names to tag rows, creating missing ones on demand.
//! - Load the tag set of one quote through `quote_tags`.
//!
//! # Invariants
//! - A missing tag is the `None` branch of a lookup, never an error.
//! - Helpers take a plain `&Connection` so they run inside the caller's
//!   transaction when given one.

use crate::model::quote::QuoteId;
use crate::model::tag::{Tag, TagId};
use crate::repo::quote_repo::RepoResult;
use rusqlite::{Connection, OptionalExtension, Row};

const TAG_SELECT_SQL: &str = "SELECT
    t.id,
    t.name,
    t.created_at,
    t.updated_at,
    t.deleted_at
FROM tags t";

/// Outcome of resolving one tag name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagResolution {
    /// A live tag with this name already existed and was reused.
    Existing(Tag),
    /// No live tag had this name; a new row was inserted.
    Created(Tag),
}

impl TagResolution {
    pub fn tag(&self) -> &Tag {
        match self {
            Self::Existing(tag) | Self::Created(tag) => tag,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// Looks up a live tag by exact name.
pub fn find_tag_by_name(conn: &Connection, name: &str) -> RepoResult<Option<Tag>> {
    let tag = conn
        .query_row(
            &format!(
                "{TAG_SELECT_SQL}
                 WHERE t.name = ?1
                   AND t.deleted_at IS NULL;"
            ),
            [name],
            parse_tag_row,
        )
        .optional()?;
    Ok(tag)
}

/// Returns the live tag named `name`, inserting it first when absent.
///
/// Callers must run this inside a write transaction so the lookup and the
/// insert observe the same snapshot.
pub fn get_or_create_tag(conn: &Connection, name: &str) -> RepoResult<TagResolution> {
    if let Some(tag) = find_tag_by_name(conn, name)? {
        return Ok(TagResolution::Existing(tag));
    }

    conn.execute("INSERT INTO tags (name) VALUES (?1);", [name])?;
    let id = TagId(conn.last_insert_rowid());
    let tag = conn.query_row(
        &format!("{TAG_SELECT_SQL} WHERE t.id = ?1;"),
        [id.0],
        parse_tag_row,
    )?;
    Ok(TagResolution::Created(tag))
}

/// Loads the live tags associated with one quote, in store-native order.
pub fn load_tags_for_quote(conn: &Connection, quote_id: QuoteId) -> RepoResult<Vec<Tag>> {
    let mut stmt = conn.prepare(&format!(
        "{TAG_SELECT_SQL}
         INNER JOIN quote_tags qt ON qt.tag_id = t.id
         WHERE qt.quote_id = ?1
           AND t.deleted_at IS NULL;"
    ))?;
    let mut rows = stmt.query([quote_id.0])?;
    let mut tags = Vec::new();
    while let Some(row) = rows.next()? {
        tags.push(parse_tag_row(row)?);
    }
    Ok(tags)
}

/// Returns the name of every live tag, in store-native order.
pub fn list_tag_names(conn: &Connection) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM tags WHERE deleted_at IS NULL;")?;
    let mut rows = stmt.query([])?;
    let mut names = Vec::new();
    while let Some(row) = rows.next()? {
        names.push(row.get("name")?);
    }
    Ok(names)
}

fn parse_tag_row(row: &Row<'_>) -> rusqlite::Result<Tag> {
    Ok(Tag {
        id: TagId(row.get("id")?),
        name: row.get("name")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        deleted_at: row.get("deleted_at")?,
    })
}
