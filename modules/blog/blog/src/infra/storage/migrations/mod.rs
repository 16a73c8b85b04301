use sea_orm_migration::prelude::*;

mod m20241028_000001_create_users_tables;
mod m20241028_000002_create_posts_and_tags;
mod m20241028_000003_create_post_tag_table;
mod m20241028_000004_create_polymorphic_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20241028_000001_create_users_tables::Migration),
            Box::new(m20241028_000002_create_posts_and_tags::Migration),
            Box::new(m20241028_000003_create_post_tag_table::Migration),
            Box::new(m20241028_000004_create_polymorphic_tables::Migration),
        ]
    }
}

/// Raised by the raw-SQL migrations on backends the schema is not written for.
fn unsupported_backend(backend: sea_orm::DatabaseBackend) -> DbErr {
    DbErr::Migration(format!("blog schema does not support {backend:?}"))
}
