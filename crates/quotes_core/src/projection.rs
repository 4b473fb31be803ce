//! External, storage-agnostic view of a quote.
//!
//! # Invariants
//! - Projection is pure: no filtering, deduplication or sorting of tags.
//! - Tag names keep the order in which tags were loaded.

use crate::model::quote::Quote;
use serde::{Deserialize, Serialize};

/// Quote shape handed to callers outside the data-access layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteView {
    pub text: String,
    pub author: String,
    pub tags: Vec<String>,
}

impl From<&Quote> for QuoteView {
    fn from(quote: &Quote) -> Self {
        Self {
            text: quote.text.clone(),
            author: quote.author.clone(),
            tags: quote.tags.iter().map(|tag| tag.name.clone()).collect(),
        }
    }
}

/// Projects loaded quotes, preserving their order.
pub fn project_quotes(quotes: &[Quote]) -> Vec<QuoteView> {
    quotes.iter().map(QuoteView::from).collect()
}
