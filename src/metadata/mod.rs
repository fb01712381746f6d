//! # Search Metadata
//!
//! Entity and relation descriptors consumed by the
//! [`SearchComposer`](crate::SearchComposer). An entity declares its table, the
//! columns eligible for substring search and a map of named relations. Each
//! relation records its owner, because a relation can only be traversed from the
//! entity that owns it.
//!
//! ```rust,ignore
//! let registry = Registry::builder()
//!     .entity(
//!         EntityDescriptor::new("roles")
//!             .search_fields(["name"])
//!             .relation(
//!                 "permissions",
//!                 RelationDescriptor::many_to_many(
//!                     "roles",
//!                     "permissions",
//!                     ManyToManyRelation::new("roles_permissions", "role_id", "permission_id"),
//!                 ),
//!             ),
//!     )
//!     .entity(EntityDescriptor::new("permissions").search_fields(["action"]))
//!     .build()?;
//! ```

pub mod entity;
pub mod registry;
pub mod relation;

pub use entity::EntityDescriptor;
pub use registry::{Registry, RegistryBuilder};
pub use relation::{DirectRelation, KeyColumns, ManyToManyRelation, RelationDescriptor, RelationKind};
