use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::ConnectionTrait;

use super::unsupported_backend;

/// Images, comments and taggables hold `(kind, id)` owner pairs with no
/// foreign key on the id; ownership is enforced by the repositories.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let conn = manager.get_connection();

        let sql = match backend {
            sea_orm::DatabaseBackend::Postgres => {
                r"
CREATE TABLE IF NOT EXISTS images (
    id BIGSERIAL PRIMARY KEY,
    url VARCHAR(2048) NOT NULL,
    imageable_type VARCHAR(16) NOT NULL,
    imageable_id BIGINT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_images_imageable ON images(imageable_type, imageable_id);

CREATE TABLE IF NOT EXISTS videos (
    id BIGSERIAL PRIMARY KEY,
    title VARCHAR(255) NOT NULL,
    url VARCHAR(2048) NOT NULL,
    description TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL
);

CREATE TABLE IF NOT EXISTS comments (
    id BIGSERIAL PRIMARY KEY,
    body TEXT NOT NULL,
    commentable_type VARCHAR(16) NOT NULL,
    commentable_id BIGINT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_comments_commentable ON comments(commentable_type, commentable_id);

CREATE TABLE IF NOT EXISTS taggables (
    tag_id BIGINT NOT NULL,
    taggable_type VARCHAR(16) NOT NULL,
    taggable_id BIGINT NOT NULL,
    PRIMARY KEY (tag_id, taggable_type, taggable_id),
    CONSTRAINT fk_taggables_tag FOREIGN KEY (tag_id) REFERENCES tags(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_taggables_taggable ON taggables(taggable_type, taggable_id);
                "
            }
            sea_orm::DatabaseBackend::Sqlite => {
                r"
CREATE TABLE IF NOT EXISTS images (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL,
    imageable_type TEXT NOT NULL,
    imageable_id INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_images_imageable ON images(imageable_type, imageable_id);

CREATE TABLE IF NOT EXISTS videos (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    url TEXT NOT NULL,
    description TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS comments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    body TEXT NOT NULL,
    commentable_type TEXT NOT NULL,
    commentable_id INTEGER NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_comments_commentable ON comments(commentable_type, commentable_id);

CREATE TABLE IF NOT EXISTS taggables (
    tag_id INTEGER NOT NULL,
    taggable_type TEXT NOT NULL,
    taggable_id INTEGER NOT NULL,
    PRIMARY KEY (tag_id, taggable_type, taggable_id),
    FOREIGN KEY (tag_id) REFERENCES tags(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_taggables_taggable ON taggables(taggable_type, taggable_id);
                "
            }
            other @ sea_orm::DatabaseBackend::MySql => return Err(unsupported_backend(other)),
        };

        conn.execute_unprepared(sql).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        let sql = r"
DROP TABLE IF EXISTS taggables;
DROP TABLE IF EXISTS comments;
DROP TABLE IF EXISTS videos;
DROP TABLE IF EXISTS images;
        ";

        conn.execute_unprepared(sql).await?;
        Ok(())
    }
}
