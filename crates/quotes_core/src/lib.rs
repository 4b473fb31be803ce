//! Data-access layer for quotes, their authors and their tags.
//! This crate owns the persistence invariants of the quotes store.

pub mod db;
pub mod logging;
pub mod model;
pub mod projection;
pub mod repo;
pub mod service;

pub use db::{connect, connect_with_policy, ConnectPolicy, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::quote::{NewQuote, Quote, QuoteId};
pub use model::tag::{Tag, TagId};
pub use projection::{project_quotes, QuoteView};
pub use repo::quote_repo::{
    QuoteRepository, RepoError, RepoResult, SharedConnection, SqliteQuoteRepository, TagLoading,
};
pub use repo::tag_repo::TagResolution;
pub use service::quote_service::QuoteService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
