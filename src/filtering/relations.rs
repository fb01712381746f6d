//! Sub-query builders for one relation hop.
//!
//! Both strategies end in `owner.key IN (SELECT ...)`, so they can be OR-ed with
//! the owner's own field predicates without joining anything into the outer
//! query.

use sea_orm::{
    Condition,
    sea_query::{Alias, ConditionalStatement, Expr, Query, SelectStatement, SimpleExpr},
};

use super::search::{SearchPattern, own_field_condition};
use crate::metadata::{DirectRelation, EntityDescriptor, KeyColumns, ManyToManyRelation};

/// `table.col` or `(table.col1, table.col2, ...)` for composite keys
fn key_expr(table: &str, key: &KeyColumns) -> Expr {
    match key.columns() {
        [column] => Expr::col((Alias::new(table), Alias::new(column))),
        columns => Expr::tuple(
            columns
                .iter()
                .map(|column| Expr::col((Alias::new(table), Alias::new(column))).into()),
        ),
    }
}

/// `SELECT table.key FROM table WHERE condition`
fn project(table: &str, key: &KeyColumns, condition: Condition) -> SelectStatement {
    Query::select()
        .columns(
            key.columns()
                .iter()
                .map(|column| (Alias::new(table), Alias::new(column))),
        )
        .from(Alias::new(table))
        .cond_where(condition)
        .to_owned()
}

/// `owner.key IN (SELECT related.fk FROM related WHERE <related matches>)`
///
/// Returns `None` when the related entity has no search fields.
#[must_use]
pub fn direct_relation_predicate(
    owner: &EntityDescriptor,
    related: &EntityDescriptor,
    relation: &DirectRelation,
    pattern: &SearchPattern,
) -> Option<SimpleExpr> {
    let related_match = own_field_condition(related, pattern)?;

    let related_keys = project(related.table_name(), &relation.foreign_key, related_match);

    Some(key_expr(owner.table_name(), &relation.owner_key).in_subquery(related_keys))
}

/// `owner.key IN (SELECT join.owner_fk FROM join WHERE join.owner_fk IN (<owners matching>)
///                                              OR join.related_fk IN (<related matching>))`
///
/// A side without search fields is left out of the join filter; `None` when
/// neither side can match.
#[must_use]
pub fn many_to_many_predicate(
    owner: &EntityDescriptor,
    related: &EntityDescriptor,
    relation: &ManyToManyRelation,
    pattern: &SearchPattern,
) -> Option<SimpleExpr> {
    let join_table = relation.join_table.as_str();
    let mut join_filter = Condition::any();

    if let Some(owner_match) = own_field_condition(owner, pattern) {
        let owner_keys = project(owner.table_name(), &relation.owner_key, owner_match);
        join_filter = join_filter
            .add(key_expr(join_table, &relation.join_owner_key).in_subquery(owner_keys));
    }

    if let Some(related_match) = own_field_condition(related, pattern) {
        let related_keys = project(related.table_name(), &relation.related_key, related_match);
        join_filter = join_filter
            .add(key_expr(join_table, &relation.join_related_key).in_subquery(related_keys));
    }

    if join_filter.is_empty() {
        return None;
    }

    let linked_owners = project(join_table, &relation.join_owner_key, join_filter);

    Some(key_expr(owner.table_name(), &relation.owner_key).in_subquery(linked_owners))
}
