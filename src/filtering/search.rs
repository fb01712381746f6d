use sea_orm::{
    Condition,
    sea_query::{Alias, BinOper, Expr, Func, SimpleExpr},
};

use crate::config::SearchConfig;
use crate::metadata::EntityDescriptor;

const LIKE_ESCAPE: char = '\\';

/// Escape LIKE wildcards to prevent wildcard injection attacks
/// Escapes: % (match any) and _ (match single char)
fn escape_like_wildcards(input: &str) -> String {
    // Escape backslash first
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Case-insensitive substring pattern for one search term.
///
/// The term only ever travels as a bound value; column names come from the
/// registry. Case folding happens in the database on both sides of the
/// `LIKE`, so the column and the term always go through the same `UPPER`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPattern {
    pattern: String,
    escaped: bool,
}

impl SearchPattern {
    /// Returns `None` when the term is blank after normalisation.
    #[must_use]
    pub fn new(term: &str, config: &SearchConfig) -> Option<Self> {
        let term = config.normalize_term(term)?;
        let body = if config.escape_wildcards {
            escape_like_wildcards(term)
        } else {
            term.to_string()
        };

        Some(Self {
            pattern: format!("%{body}%"),
            escaped: config.escape_wildcards,
        })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// `UPPER(table.column) LIKE UPPER('%term%') ESCAPE '\'`
    #[must_use]
    pub fn matches(&self, table: &str, column: &str) -> SimpleExpr {
        let column = Expr::col((Alias::new(table), Alias::new(column)));
        let pattern = SimpleExpr::from(Func::upper(Expr::val(self.pattern.clone())));

        // ESCAPE nests under the right-hand side of LIKE
        let pattern = if self.escaped {
            pattern.binary(BinOper::Escape, SimpleExpr::Constant(LIKE_ESCAPE.into()))
        } else {
            pattern
        };

        SimpleExpr::from(Func::upper(column)).binary(BinOper::Like, pattern)
    }
}

/// One predicate per search field, in declaration order.
#[must_use]
pub fn own_field_predicates(entity: &EntityDescriptor, pattern: &SearchPattern) -> Vec<SimpleExpr> {
    let table = entity.table_name();
    entity
        .search_fields
        .iter()
        .map(|field| pattern.matches(table, field))
        .collect()
}

/// OR of [`own_field_predicates`], or `None` for an entity without search fields.
#[must_use]
pub fn own_field_condition(entity: &EntityDescriptor, pattern: &SearchPattern) -> Option<Condition> {
    let predicates = own_field_predicates(entity, pattern);
    if predicates.is_empty() {
        return None;
    }

    Some(
        predicates
            .into_iter()
            .fold(Condition::any(), Condition::add),
    )
}
