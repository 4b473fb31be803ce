//! Quote use-case service.
//!
//! # Responsibility
//! - Expose the caller-facing quote operations over a repository.
//! - Always eager-load tags and project results into `QuoteView`.
//!
//! # Invariants
//! - Repository errors are returned unchanged.
//! - Service layer remains storage-agnostic.
//! - Every operation takes `&self`; the service is `Send + Sync` whenever
//!   its repository is, so one instance can serve many threads.

use crate::model::quote::{NewQuote, QuoteId};
use crate::projection::{project_quotes, QuoteView};
use crate::repo::quote_repo::{QuoteRepository, RepoResult, TagLoading};

/// Quote service facade over repository implementations.
pub struct QuoteService<R: QuoteRepository> {
    repo: R,
}

impl<R: QuoteRepository> QuoteService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Quotes attributed exactly to `author`. Unknown authors give an empty list.
    pub fn get_by_author(&self, author: &str) -> RepoResult<Vec<QuoteView>> {
        let quotes = self.repo.quotes_by_author(author, TagLoading::Eager)?;
        Ok(project_quotes(&quotes))
    }

    /// Quotes linked to the tag named `tag`. Unknown tags give an empty list.
    pub fn get_by_tag(&self, tag: &str) -> RepoResult<Vec<QuoteView>> {
        let quotes = self.repo.quotes_by_tag(tag, TagLoading::Eager)?;
        Ok(project_quotes(&quotes))
    }

    pub fn get_all(&self) -> RepoResult<Vec<QuoteView>> {
        let quotes = self.repo.all_quotes(TagLoading::Eager)?;
        Ok(project_quotes(&quotes))
    }

    pub fn get_all_tag_names(&self) -> RepoResult<Vec<String>> {
        self.repo.tag_names()
    }

    pub fn is_empty(&self) -> RepoResult<bool> {
        self.repo.is_empty()
    }

    /// Stores `quote` linked to `tag_names`, reusing existing tags.
    ///
    /// # Contract
    /// - All-or-nothing: on error no quote, tag or link row from this call remains.
    /// - Returns the stored quote ID only after commit.
    pub fn add_quote_with_tags(
        &self,
        quote: NewQuote,
        tag_names: Vec<String>,
    ) -> RepoResult<QuoteId> {
        self.repo.add_quote_with_tags(&quote, &tag_names)
    }
}
