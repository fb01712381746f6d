use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

use super::entity::EntityDescriptor;
use super::relation::{KeyColumns, RelationDescriptor, RelationKind};
use crate::config::SearchConfig;
use crate::errors::RegistryError;

/// Immutable table of entity and relation metadata.
///
/// Build it once before serving requests and share it by reference; nothing
/// mutates it afterwards.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entities: HashMap<String, EntityDescriptor>,
    tables: HashMap<String, String>,
    config: SearchConfig,
}

/// On-disk form accepted by [`Registry::from_json`].
#[derive(Debug, Deserialize)]
struct RegistryDocument {
    #[serde(default)]
    search: SearchConfig,
    entities: Vec<EntityDescriptor>,
}

impl Registry {
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Load and validate a registry document.
    ///
    /// ```json
    /// {
    ///   "search": { "max_term_length": 256 },
    ///   "entities": [
    ///     { "name": "resources", "search_fields": ["name"], "relations": {
    ///         "permissions": { "owner": "resources", "related": "permissions",
    ///                          "kind": "direct", "foreign_key": "resource_id" } } },
    ///     { "name": "permissions", "search_fields": ["action"] }
    ///   ]
    /// }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Parse` for malformed JSON and the usual validation
    /// errors for inconsistent metadata.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let document: RegistryDocument = serde_json::from_str(json)?;
        document
            .entities
            .into_iter()
            .fold(Self::builder().config(document.search), RegistryBuilder::entity)
            .build()
    }

    #[must_use]
    pub fn entity(&self, name: &str) -> Option<&EntityDescriptor> {
        self.entities.get(name)
    }

    #[must_use]
    pub fn entity_by_table(&self, table: &str) -> Option<&EntityDescriptor> {
        self.tables.get(table).and_then(|name| self.entities.get(name))
    }

    /// Ordered search fields of an entity; `None` for unknown entities.
    #[must_use]
    pub fn search_fields(&self, name: &str) -> Option<&[String]> {
        self.entity(name).map(|entity| entity.search_fields.as_slice())
    }

    #[must_use]
    pub fn relations(&self, name: &str) -> Option<&BTreeMap<String, RelationDescriptor>> {
        self.entity(name).map(|entity| &entity.relations)
    }

    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn entities(&self) -> impl Iterator<Item = &EntityDescriptor> {
        self.entities.values()
    }
}

#[derive(Debug, Default)]
pub struct RegistryBuilder {
    entities: Vec<EntityDescriptor>,
    config: SearchConfig,
}

impl RegistryBuilder {
    #[must_use]
    pub fn entity(mut self, entity: EntityDescriptor) -> Self {
        self.entities.push(entity);
        self
    }

    #[must_use]
    pub fn config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    /// Validate every relation and freeze the metadata.
    ///
    /// # Errors
    ///
    /// Fails on a zero `max_term_length`, duplicate entities or tables,
    /// relations pointing at unknown entities, relations declared on an
    /// unrelated entity, and empty or mismatched key column lists.
    pub fn build(self) -> Result<Registry, RegistryError> {
        if self.config.max_term_length == 0 {
            return Err(RegistryError::InvalidConfig {
                setting: "max_term_length",
                reason: "must be at least 1",
            });
        }

        let mut entities = HashMap::with_capacity(self.entities.len());
        let mut tables = HashMap::with_capacity(self.entities.len());

        for entity in self.entities {
            let table = entity.table_name().to_string();
            if tables.insert(table.clone(), entity.name.clone()).is_some() {
                return Err(RegistryError::DuplicateTable { table });
            }
            if entities.contains_key(&entity.name) {
                return Err(RegistryError::DuplicateEntity {
                    entity: entity.name,
                });
            }
            entities.insert(entity.name.clone(), entity);
        }

        for entity in entities.values() {
            for (name, relation) in &entity.relations {
                validate_relation(&entities, &entity.name, name, relation)?;
                warn_if_unsearchable(&entities, name, relation);
            }
        }

        tracing::debug!(entities = entities.len(), "Search registry built");

        Ok(Registry {
            entities,
            tables,
            config: self.config,
        })
    }
}

fn validate_relation(
    entities: &HashMap<String, EntityDescriptor>,
    declared_on: &str,
    name: &str,
    relation: &RelationDescriptor,
) -> Result<(), RegistryError> {
    for endpoint in [&relation.owner, &relation.related] {
        if !entities.contains_key(endpoint) {
            return Err(RegistryError::UnknownEntity {
                relation: name.to_string(),
                entity: endpoint.clone(),
            });
        }
    }

    if relation.owner != declared_on && relation.related != declared_on {
        return Err(RegistryError::ForeignRelation {
            entity: declared_on.to_string(),
            relation: name.to_string(),
        });
    }

    match &relation.kind {
        RelationKind::Direct(direct) => check_key_pair(
            name,
            ("owner_key", &direct.owner_key),
            ("foreign_key", &direct.foreign_key),
        ),
        RelationKind::ManyToMany(m2m) => {
            check_key_pair(
                name,
                ("owner_key", &m2m.owner_key),
                ("join_owner_key", &m2m.join_owner_key),
            )?;
            check_key_pair(
                name,
                ("related_key", &m2m.related_key),
                ("join_related_key", &m2m.join_related_key),
            )
        }
    }
}

/// Relations whose searchable side has no fields contribute nothing to a search.
fn warn_if_unsearchable(
    entities: &HashMap<String, EntityDescriptor>,
    name: &str,
    relation: &RelationDescriptor,
) {
    let has_fields = |entity: &str| {
        entities
            .get(entity)
            .is_some_and(|entity| !entity.search_fields.is_empty())
    };

    if has_fields(&relation.related) {
        return;
    }

    match relation.kind {
        RelationKind::ManyToMany(_) if has_fields(&relation.owner) => tracing::warn!(
            relation = %name,
            owner = %relation.owner,
            related = %relation.related,
            "Related entity has no search fields; only owner matches reach the join table"
        ),
        _ => tracing::warn!(
            relation = %name,
            owner = %relation.owner,
            related = %relation.related,
            "Related entity has no search fields; relation contributes nothing"
        ),
    }
}

fn check_key_pair(
    relation: &str,
    (left, left_key): (&'static str, &KeyColumns),
    (right, right_key): (&'static str, &KeyColumns),
) -> Result<(), RegistryError> {
    for (key, columns) in [(left, left_key), (right, right_key)] {
        if columns.is_empty() {
            return Err(RegistryError::EmptyKey {
                relation: relation.to_string(),
                key,
            });
        }
    }
    if left_key.len() != right_key.len() {
        return Err(RegistryError::KeyArityMismatch {
            relation: relation.to_string(),
            left,
            right,
        });
    }
    Ok(())
}
