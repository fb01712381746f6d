use serde::{Deserialize, Serialize};

/// One or more column names forming a key. Composite keys are compared as row tuples.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "KeyColumnsRepr")]
pub struct KeyColumns(Vec<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum KeyColumnsRepr {
    One(String),
    Many(Vec<String>),
}

impl From<KeyColumnsRepr> for KeyColumns {
    fn from(repr: KeyColumnsRepr) -> Self {
        match repr {
            KeyColumnsRepr::One(column) => Self(vec![column]),
            KeyColumnsRepr::Many(columns) => Self(columns),
        }
    }
}

impl KeyColumns {
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for KeyColumns {
    fn from(column: &str) -> Self {
        Self(vec![column.to_string()])
    }
}

impl From<String> for KeyColumns {
    fn from(column: String) -> Self {
        Self(vec![column])
    }
}

impl<const N: usize> From<[&str; N]> for KeyColumns {
    fn from(columns: [&str; N]) -> Self {
        Self(columns.iter().map(ToString::to_string).collect())
    }
}

impl From<Vec<String>> for KeyColumns {
    fn from(columns: Vec<String>) -> Self {
        Self(columns)
    }
}

fn default_key() -> KeyColumns {
    KeyColumns::from("id")
}

/// Has-one / has-many: the foreign key lives on the related table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectRelation {
    /// Owner columns referenced by the foreign key
    #[serde(default = "default_key")]
    pub owner_key: KeyColumns,
    /// Columns on the related table that reference `owner_key`
    pub foreign_key: KeyColumns,
}

impl DirectRelation {
    pub fn new(owner_key: impl Into<KeyColumns>, foreign_key: impl Into<KeyColumns>) -> Self {
        Self {
            owner_key: owner_key.into(),
            foreign_key: foreign_key.into(),
        }
    }
}

/// Owner and related entity linked through an intermediate join table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManyToManyRelation {
    pub join_table: String,
    /// Join table columns referencing `owner_key`
    pub join_owner_key: KeyColumns,
    /// Join table columns referencing `related_key`
    pub join_related_key: KeyColumns,
    #[serde(default = "default_key")]
    pub owner_key: KeyColumns,
    #[serde(default = "default_key")]
    pub related_key: KeyColumns,
}

impl ManyToManyRelation {
    /// Owner and related keys default to `id`.
    pub fn new(
        join_table: impl Into<String>,
        join_owner_key: impl Into<KeyColumns>,
        join_related_key: impl Into<KeyColumns>,
    ) -> Self {
        Self {
            join_table: join_table.into(),
            join_owner_key: join_owner_key.into(),
            join_related_key: join_related_key.into(),
            owner_key: default_key(),
            related_key: default_key(),
        }
    }

    #[must_use]
    pub fn with_keys(
        mut self,
        owner_key: impl Into<KeyColumns>,
        related_key: impl Into<KeyColumns>,
    ) -> Self {
        self.owner_key = owner_key.into();
        self.related_key = related_key.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RelationKind {
    Direct(DirectRelation),
    ManyToMany(ManyToManyRelation),
}

impl RelationKind {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Direct(_) => "direct",
            Self::ManyToMany(_) => "many_to_many",
        }
    }
}

/// A named relation from an owner entity to a related entity.
///
/// A relation may be declared on either of its two entities, but it can only be
/// searched from the owner side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationDescriptor {
    pub owner: String,
    pub related: String,
    #[serde(flatten)]
    pub kind: RelationKind,
}

impl RelationDescriptor {
    pub fn direct(
        owner: impl Into<String>,
        related: impl Into<String>,
        relation: DirectRelation,
    ) -> Self {
        Self {
            owner: owner.into(),
            related: related.into(),
            kind: RelationKind::Direct(relation),
        }
    }

    pub fn many_to_many(
        owner: impl Into<String>,
        related: impl Into<String>,
        relation: ManyToManyRelation,
    ) -> Self {
        Self {
            owner: owner.into(),
            related: related.into(),
            kind: RelationKind::ManyToMany(relation),
        }
    }

    #[must_use]
    pub fn is_owned_by(&self, entity: &str) -> bool {
        self.owner == entity
    }
}
