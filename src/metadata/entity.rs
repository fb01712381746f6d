use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::relation::RelationDescriptor;

/// Search metadata for one entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDescriptor {
    pub name: String,
    /// Defaults to `name` when empty
    #[serde(default)]
    pub table: String,
    /// Columns matched by substring search, in declaration order
    #[serde(default)]
    pub search_fields: Vec<String>,
    #[serde(default)]
    pub relations: BTreeMap<String, RelationDescriptor>,
}

impl EntityDescriptor {
    /// Entity whose table shares its name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            table: name.clone(),
            name,
            search_fields: Vec::new(),
            relations: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    #[must_use]
    pub fn search_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn relation(mut self, name: impl Into<String>, relation: RelationDescriptor) -> Self {
        self.relations.insert(name.into(), relation);
        self
    }

    /// Table name, falling back to the entity name.
    #[must_use]
    pub fn table_name(&self) -> &str {
        if self.table.is_empty() {
            &self.name
        } else {
            &self.table
        }
    }
}
