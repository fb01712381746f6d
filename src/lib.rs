pub mod composer;
pub mod config;
pub mod errors;
pub mod filtering;
pub mod metadata;

pub use composer::{RelationNames, SearchComposer, SearchExt, SearchTarget};
pub use config::SearchConfig;
pub use errors::{RegistryError, SearchError};
pub use metadata::{
    DirectRelation, EntityDescriptor, KeyColumns, ManyToManyRelation, Registry, RelationDescriptor,
    RelationKind,
};
