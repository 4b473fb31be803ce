//! Domain model for quotes and their tags.
//!
//! # Responsibility
//! - Define the entity shapes persisted by the quotes store.
//! - Keep storage identity (`QuoteId`, `TagId`) distinct from plain integers.
//!
//! # Invariants
//! - Identifiers are assigned by storage, never by callers.
//! - Deletion is represented by a `deleted_at` tombstone, not hard delete.

pub mod quote;
pub mod tag;
