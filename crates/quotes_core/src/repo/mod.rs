//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Store failures are returned unchanged inside `RepoError::Db`.
//! - "Tag not found" is modelled as `Option`, never as an error value.

pub mod quote_repo;
pub mod tag_repo;
