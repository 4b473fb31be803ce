//! Quote entity and its write-side input.
//!
//! # Invariants
//! - `tags` is only populated when the query asked for eager tag loading.
//! - A `Quote` read back from storage always has `deleted_at == None`.

use crate::model::tag::Tag;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Storage-assigned quote identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuoteId(pub i64);

impl Display for QuoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Persisted quote row with its (optionally loaded) tag set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub id: QuoteId,
    /// Quote body.
    pub text: String,
    /// Exact, case-sensitive attribution used by author lookups.
    pub author: String,
    /// Epoch milliseconds.
    pub created_at: i64,
    /// Epoch milliseconds.
    pub updated_at: i64,
    /// Soft delete tombstone. Never set by this crate.
    pub deleted_at: Option<i64>,
    /// Associated tags in load order. Empty when tags were not loaded.
    pub tags: Vec<Tag>,
}

/// Caller-supplied quote fields for `add_quote_with_tags`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQuote {
    pub text: String,
    pub author: String,
}

impl NewQuote {
    pub fn new(text: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            author: author.into(),
        }
    }
}
