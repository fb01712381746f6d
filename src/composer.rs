//! # Relation-Aware Search
//!
//! [`SearchComposer`] turns a free-text term into one OR group over:
//!
//! - the searched entity's own search fields, and
//! - for every requested relation, the owner rows whose related rows match
//!   (direct foreign keys or many-to-many through a join table).
//!
//! The group is merged into the caller's query with `AND`, so any filters the
//! caller already applied keep constraining the result.
//!
//! ```rust,ignore
//! let composer = SearchComposer::new(&registry);
//!
//! // Own fields only
//! let roles = role::Entity::find().search(&composer, "admin")?.all(&db).await?;
//!
//! // Own fields OR matching permissions OR matching users
//! let roles = role::Entity::find()
//!     .search_related(&composer, "user", ["permissions", "users"])?
//!     .all(&db)
//!     .await?;
//! ```
//!
//! Relations are traversed exactly one hop and only from the owning side.
//! Searching through an undeclared relation or from the related side is a
//! programming error and is reported as [`SearchError`].

use sea_orm::{
    Condition, EntityName, EntityTrait, QueryTrait, Select,
    sea_query::{ConditionalStatement, SelectStatement},
};

use crate::errors::SearchError;
use crate::filtering::{
    SearchPattern, direct_relation_predicate, many_to_many_predicate, own_field_predicates,
};
use crate::metadata::{EntityDescriptor, Registry, RelationDescriptor, RelationKind};

/// Zero, one or several relation names to search through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationNames<'a>(Vec<&'a str>);

impl<'a> RelationNames<'a> {
    #[must_use]
    pub fn none() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn as_slice(&self) -> &[&'a str] {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<()> for RelationNames<'_> {
    fn from((): ()) -> Self {
        Self::none()
    }
}

impl<'a> From<&'a str> for RelationNames<'a> {
    fn from(name: &'a str) -> Self {
        Self(vec![name])
    }
}

impl<'a> From<&'a String> for RelationNames<'a> {
    fn from(name: &'a String) -> Self {
        Self(vec![name.as_str()])
    }
}

impl<'a> From<Option<&'a str>> for RelationNames<'a> {
    fn from(name: Option<&'a str>) -> Self {
        Self(name.into_iter().collect())
    }
}

impl<'a> From<&'a [&'a str]> for RelationNames<'a> {
    fn from(names: &'a [&'a str]) -> Self {
        Self(names.to_vec())
    }
}

impl<'a> From<&'a [String]> for RelationNames<'a> {
    fn from(names: &'a [String]) -> Self {
        Self(names.iter().map(String::as_str).collect())
    }
}

impl<'a, const N: usize> From<[&'a str; N]> for RelationNames<'a> {
    fn from(names: [&'a str; N]) -> Self {
        Self(names.to_vec())
    }
}

impl<'a> From<Vec<&'a str>> for RelationNames<'a> {
    fn from(names: Vec<&'a str>) -> Self {
        Self(names)
    }
}

/// A query the composed search group can be merged into.
pub trait SearchTarget {
    /// AND the search group onto the query's existing conditions.
    fn merge_search(&mut self, condition: Condition);
}

impl SearchTarget for SelectStatement {
    fn merge_search(&mut self, condition: Condition) {
        self.cond_where(condition);
    }
}

impl<E: EntityTrait> SearchTarget for Select<E> {
    fn merge_search(&mut self, condition: Condition) {
        QueryTrait::query(self).cond_where(condition);
    }
}

/// Stateless search builder over an immutable [`Registry`].
#[derive(Debug, Clone, Copy)]
pub struct SearchComposer<'r> {
    registry: &'r Registry,
}

struct ResolvedRelation<'r> {
    name: &'r str,
    descriptor: &'r RelationDescriptor,
    related: &'r EntityDescriptor,
}

impl<'r> SearchComposer<'r> {
    #[must_use]
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    #[must_use]
    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// Build the OR group for `term` on `entity`, optionally through relations.
    ///
    /// Own-field predicates come first. With relations, they are repeated before
    /// each relation predicate, so `[a, b]` yields `own OR a OR own OR b`. The
    /// repetition does not change the result set.
    ///
    /// Returns `Ok(None)` when nothing can match: a blank term, or no search
    /// fields anywhere along the requested paths.
    ///
    /// # Errors
    ///
    /// `UnknownEntity` for an unregistered entity, `RelationNotFound` for a
    /// relation missing from its relation map and `NotRelationOwner` when the
    /// entity is not the relation's owner. Relations are all checked before
    /// anything is built.
    pub fn compose<'a>(
        &self,
        entity: &str,
        term: &str,
        relations: impl Into<RelationNames<'a>>,
    ) -> Result<Option<Condition>, SearchError> {
        let descriptor = self
            .registry
            .entity(entity)
            .ok_or_else(|| SearchError::unknown_entity(entity))?;
        let relations = relations.into();
        let resolved = relations
            .as_slice()
            .iter()
            .map(|name| self.resolve(descriptor, name))
            .collect::<Result<Vec<_>, _>>()?;

        let Some(pattern) = SearchPattern::new(term, self.registry.config()) else {
            tracing::debug!(entity, "Blank search term; search skipped");
            return Ok(None);
        };

        let mut group = Condition::any();
        if resolved.is_empty() {
            group = add_own_fields(group, descriptor, &pattern);
        }
        for relation in &resolved {
            group = add_own_fields(group, descriptor, &pattern);
            if let Some(predicate) = relation_predicate(descriptor, relation, &pattern) {
                group = group.add(predicate);
            }
        }

        tracing::trace!(entity, predicates = group.len(), "Composed search group");

        Ok((!group.is_empty()).then_some(group))
    }

    /// Own-field search merged into `query`.
    ///
    /// # Errors
    ///
    /// `UnknownEntity` if `entity` is not registered.
    pub fn search<Q: SearchTarget>(
        &self,
        query: Q,
        entity: &str,
        term: &str,
    ) -> Result<Q, SearchError> {
        self.search_related(query, entity, term, RelationNames::none())
    }

    /// Own-field and relation search merged into `query`.
    ///
    /// On error `query` is dropped untouched; nothing is merged.
    ///
    /// # Errors
    ///
    /// See [`SearchComposer::compose`].
    pub fn search_related<'a, Q: SearchTarget>(
        &self,
        mut query: Q,
        entity: &str,
        term: &str,
        relations: impl Into<RelationNames<'a>>,
    ) -> Result<Q, SearchError> {
        if let Some(group) = self.compose(entity, term, relations)? {
            query.merge_search(group);
        }
        Ok(query)
    }

    fn resolve(
        &self,
        entity: &'r EntityDescriptor,
        name: &str,
    ) -> Result<ResolvedRelation<'r>, SearchError> {
        let (name, descriptor) = entity
            .relations
            .get_key_value(name)
            .ok_or_else(|| SearchError::relation_not_found(&entity.name, name))?;

        if !descriptor.is_owned_by(&entity.name) {
            return Err(SearchError::not_relation_owner(
                &entity.name,
                name,
                &descriptor.owner,
            ));
        }

        let related = self
            .registry
            .entity(&descriptor.related)
            .ok_or_else(|| SearchError::unknown_entity(&descriptor.related))?;

        Ok(ResolvedRelation {
            name,
            descriptor,
            related,
        })
    }
}

fn add_own_fields(group: Condition, entity: &EntityDescriptor, pattern: &SearchPattern) -> Condition {
    own_field_predicates(entity, pattern)
        .into_iter()
        .fold(group, Condition::add)
}

fn relation_predicate(
    owner: &EntityDescriptor,
    relation: &ResolvedRelation<'_>,
    pattern: &SearchPattern,
) -> Option<sea_orm::sea_query::SimpleExpr> {
    tracing::debug!(
        entity = %owner.name,
        relation = relation.name,
        kind = relation.descriptor.kind.name(),
        "Composing relation search"
    );

    match &relation.descriptor.kind {
        RelationKind::Direct(direct) => {
            direct_relation_predicate(owner, relation.related, direct, pattern)
        }
        RelationKind::ManyToMany(m2m) => {
            many_to_many_predicate(owner, relation.related, m2m, pattern)
        }
    }
}

/// Search methods on Sea-ORM `Select` queries.
///
/// The entity descriptor is looked up by the entity's table name.
pub trait SearchExt: Sized {
    /// Own-field search.
    ///
    /// # Errors
    ///
    /// `UnknownEntity` when the entity's table is not registered.
    fn search(self, composer: &SearchComposer<'_>, term: &str) -> Result<Self, SearchError>;

    /// Own-field search OR-ed with matches through `relations`.
    ///
    /// # Errors
    ///
    /// See [`SearchComposer::compose`].
    fn search_related<'a>(
        self,
        composer: &SearchComposer<'_>,
        term: &str,
        relations: impl Into<RelationNames<'a>>,
    ) -> Result<Self, SearchError>;
}

impl<E: EntityTrait> SearchExt for Select<E> {
    fn search(self, composer: &SearchComposer<'_>, term: &str) -> Result<Self, SearchError> {
        self.search_related(composer, term, RelationNames::none())
    }

    fn search_related<'a>(
        self,
        composer: &SearchComposer<'_>,
        term: &str,
        relations: impl Into<RelationNames<'a>>,
    ) -> Result<Self, SearchError> {
        let entity = E::default();
        let table = entity.table_name();
        let descriptor = composer
            .registry()
            .entity_by_table(table)
            .ok_or_else(|| SearchError::unknown_entity(table))?;

        composer.search_related(self, &descriptor.name, term, relations)
    }
}
