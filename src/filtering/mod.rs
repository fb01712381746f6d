//! # Search Predicates
//!
//! Building blocks used by the [`SearchComposer`](crate::SearchComposer):
//!
//! - **[`SearchPattern`]**: normalised, escaped `%term%` pattern
//! - **[`own_field_predicates`]**: one `UPPER(table.column) LIKE UPPER(pattern)` per search field
//! - **[`direct_relation_predicate`]**: `owner.key IN (SELECT fk FROM related WHERE ...)`
//! - **[`many_to_many_predicate`]**: `owner.key IN (SELECT owner_fk FROM join WHERE ...)`
//!
//! ## Case-insensitivity
//!
//! Matching is rendered as `UPPER(column) LIKE UPPER('%term%')` rather than
//! `ILIKE`, so the same predicate runs on `SQLite`, `PostgreSQL` and `MySQL`.
//! Both sides are folded by the database, never in Rust: a term always matches
//! an identical stored value, and non-ASCII folding is whatever the backend's
//! `UPPER` does (`SQLite` folds ASCII only).
//! `%`, `_` and `\` in the term are escaped and matched literally.

pub mod relations;
pub mod search;

pub use relations::{direct_relation_predicate, many_to_many_predicate};
pub use search::{SearchPattern, own_field_condition, own_field_predicates};
