//! # Configuration Errors
//!
//! Everything that can go wrong in this crate is a *configuration* problem:
//! either the relation metadata is inconsistent ([`RegistryError`], raised once
//! at startup) or a call site searches through a relation it does not own
//! ([`SearchError`], raised synchronously by the composer).
//!
//! None of these are retryable and none depend on user data. Request handlers
//! should not try to recover from them. When a [`SearchError`] does reach an
//! axum handler it is turned into a `500 Internal Server Error`: the details are
//! logged through `tracing` and the client only sees a generic message.
//!
//! ```rust,ignore
//! async fn list_roles(
//!     State(state): State<AppState>,
//!     Query(params): Query<ListParams>,
//! ) -> Result<Json<Vec<role::Model>>, SearchError> {
//!     let query = role::Entity::find().search(&state.composer, &params.q, "permissions")?;
//!     // ...
//! }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;

/// Error raised while composing a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The searched entity is not present in the registry
    UnknownEntity {
        /// Entity name (or table name for typed lookups)
        entity: String,
    },

    /// The relation name is not declared on the searched entity
    RelationNotFound {
        /// Entity the search was started from
        entity: String,
        /// Requested relation name
        relation: String,
    },

    /// The searched entity is not the owner of the relation
    NotRelationOwner {
        /// Entity the search was started from
        entity: String,
        /// Requested relation name
        relation: String,
        /// Declared owner of the relation
        owner: String,
    },
}

impl SearchError {
    pub fn unknown_entity(entity: impl Into<String>) -> Self {
        Self::UnknownEntity {
            entity: entity.into(),
        }
    }

    pub fn relation_not_found(entity: impl Into<String>, relation: impl Into<String>) -> Self {
        Self::RelationNotFound {
            entity: entity.into(),
            relation: relation.into(),
        }
    }

    pub fn not_relation_owner(
        entity: impl Into<String>,
        relation: impl Into<String>,
        owner: impl Into<String>,
    ) -> Self {
        Self::NotRelationOwner {
            entity: entity.into(),
            relation: relation.into(),
            owner: owner.into(),
        }
    }
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownEntity { entity } => {
                write!(f, "entity '{entity}' is not registered for search")
            }
            Self::RelationNotFound { entity, relation } => {
                write!(f, "relation '{relation}' is not declared on entity '{entity}'")
            }
            Self::NotRelationOwner {
                entity,
                relation,
                owner,
            } => write!(
                f,
                "entity '{entity}' does not own relation '{relation}'; search it from '{owner}' instead"
            ),
        }
    }
}

impl std::error::Error for SearchError {}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Search configuration error");

        let body = Json(ErrorResponse {
            error: "An internal error occurred".to_string(),
        });
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

/// Error raised while building a [`Registry`](crate::Registry).
#[derive(Debug)]
pub enum RegistryError {
    /// Two entities share a name
    DuplicateEntity { entity: String },

    /// Two entities share a table
    DuplicateTable { table: String },

    /// A relation refers to an entity that was never registered
    UnknownEntity { relation: String, entity: String },

    /// A relation is declared on an entity that is neither its owner nor its related side
    ForeignRelation { entity: String, relation: String },

    /// A key column list is empty
    EmptyKey { relation: String, key: &'static str },

    /// Paired key column lists have different lengths
    KeyArityMismatch {
        relation: String,
        left: &'static str,
        right: &'static str,
    },

    /// A search setting is out of range
    InvalidConfig {
        setting: &'static str,
        reason: &'static str,
    },

    /// The registry document could not be parsed
    Parse(serde_json::Error),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateEntity { entity } => write!(f, "entity '{entity}' registered twice"),
            Self::DuplicateTable { table } => {
                write!(f, "table '{table}' is used by more than one entity")
            }
            Self::UnknownEntity { relation, entity } => {
                write!(f, "relation '{relation}' refers to unknown entity '{entity}'")
            }
            Self::ForeignRelation { entity, relation } => write!(
                f,
                "relation '{relation}' is declared on '{entity}' which is neither its owner nor its related entity"
            ),
            Self::EmptyKey { relation, key } => {
                write!(f, "relation '{relation}' has no columns in '{key}'")
            }
            Self::KeyArityMismatch {
                relation,
                left,
                right,
            } => write!(
                f,
                "relation '{relation}': '{left}' and '{right}' must have the same number of columns"
            ),
            Self::InvalidConfig { setting, reason } => {
                write!(f, "invalid search setting '{setting}': {reason}")
            }
            Self::Parse(err) => write!(f, "invalid registry document: {err}"),
        }
    }
}

impl std::error::Error for RegistryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for RegistryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}
