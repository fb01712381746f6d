#![allow(dead_code)]

use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, Database, DatabaseConnection, DbErr, QueryOrder, Schema,
    Select,
};
use sea_orm_migration::prelude::*;
use searchcrate::{
    DirectRelation, EntityDescriptor, ManyToManyRelation, Registry, RelationDescriptor,
};
use std::sync::LazyLock;

pub mod models;

use models::{permission, resource, role, role_permission, user};

/// Registry shared by every test, built once like an application would at startup.
pub static REGISTRY: LazyLock<Registry> = LazyLock::new(|| {
    Registry::builder()
        .entity(
            EntityDescriptor::new("resources")
                .search_fields(["name"])
                .relation(
                    "permissions",
                    RelationDescriptor::direct(
                        "resources",
                        "permissions",
                        DirectRelation::new("id", "resource_id"),
                    ),
                ),
        )
        .entity(
            EntityDescriptor::new("permissions")
                .search_fields(["action"])
                .relation(
                    "resource",
                    RelationDescriptor::direct(
                        "resources",
                        "permissions",
                        DirectRelation::new("id", "resource_id"),
                    ),
                ),
        )
        .entity(
            EntityDescriptor::new("roles")
                .search_fields(["name"])
                .relation(
                    "permissions",
                    RelationDescriptor::many_to_many(
                        "roles",
                        "permissions",
                        ManyToManyRelation::new("roles_permissions", "role_id", "permission_id"),
                    ),
                )
                .relation(
                    "users",
                    RelationDescriptor::direct("roles", "users", DirectRelation::new("id", "role_id")),
                ),
        )
        .entity(EntityDescriptor::new("roles_permissions"))
        .entity(EntityDescriptor::new("users").search_fields(["email", "first_name"]))
        .build()
        .expect("test registry should be valid")
});

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    init_tracing();
    let db = Database::connect("sqlite::memory:").await?;

    Migrator::up(&db, None).await?;
    seed(&db).await?;

    Ok(db)
}

/// Ids of every row returned by `query`, ascending.
pub async fn role_ids(db: &DatabaseConnection, query: Select<role::Entity>) -> Vec<i32> {
    query
        .order_by_asc(role::Column::Id)
        .all(db)
        .await
        .expect("role query should run")
        .into_iter()
        .map(|role| role.id)
        .collect()
}

pub async fn resource_ids(db: &DatabaseConnection, query: Select<resource::Entity>) -> Vec<i32> {
    query
        .order_by_asc(resource::Column::Id)
        .all(db)
        .await
        .expect("resource query should run")
        .into_iter()
        .map(|resource| resource.id)
        .collect()
}

/// resources: 1 user, 2 role, 3 report
/// permissions: 1 create -> user, 2 manage_users -> role, 3 read -> report
/// roles: 1 admin, 2 user, 3 auditor, 4 guest, 5 superuser
/// roles_permissions: admin-manage_users, user-create, auditor-read
/// users: alice (auditor), bob (guest)
async fn seed(db: &DatabaseConnection) -> Result<(), DbErr> {
    for (id, name) in [(1, "user"), (2, "role"), (3, "report")] {
        resource::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
        }
        .insert(db)
        .await?;
    }

    for (id, action, resource_id) in [(1, "create", 1), (2, "manage_users", 2), (3, "read", 3)] {
        permission::ActiveModel {
            id: Set(id),
            action: Set(action.to_string()),
            resource_id: Set(resource_id),
        }
        .insert(db)
        .await?;
    }

    for (id, name) in [(1, "admin"), (2, "user"), (3, "auditor"), (4, "guest"), (5, "superuser")] {
        role::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
        }
        .insert(db)
        .await?;
    }

    for (role_id, permission_id) in [(1, 2), (2, 1), (3, 3)] {
        role_permission::ActiveModel {
            role_id: Set(role_id),
            permission_id: Set(permission_id),
        }
        .insert(db)
        .await?;
    }

    for (id, email, first_name, role_id) in [
        (1, "alice@example.com", "Alice", 3),
        (2, "bob@example.com", "Bob", 4),
    ] {
        user::ActiveModel {
            id: Set(id),
            email: Set(email.to_string()),
            first_name: Set(first_name.to_string()),
            role_id: Set(role_id),
        }
        .insert(db)
        .await?;
    }

    Ok(())
}

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(CreateSearchTables)]
    }
}

pub struct CreateSearchTables;

#[async_trait::async_trait]
impl MigrationName for CreateSearchTables {
    fn name(&self) -> &'static str {
        "m20240101_000001_create_search_tables"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateSearchTables {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let schema = Schema::new(manager.get_database_backend());

        manager
            .create_table(schema.create_table_from_entity(resource::Entity))
            .await?;
        manager
            .create_table(schema.create_table_from_entity(permission::Entity))
            .await?;
        manager
            .create_table(schema.create_table_from_entity(role::Entity))
            .await?;
        manager
            .create_table(schema.create_table_from_entity(role_permission::Entity))
            .await?;
        manager
            .create_table(schema.create_table_from_entity(user::Entity))
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in ["users", "roles_permissions", "roles", "permissions", "resources"] {
            manager
                .drop_table(Table::drop().table(Alias::new(table)).to_owned())
                .await?;
        }
        Ok(())
    }
}
