#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Integration tests for schema migrations and module startup

mod common;

use blog::config::BlogConfig;
use blog::module::{migrate, pending_migrations};
use blog::{Blog, Trashed};
use blog_db::DbConfig;
use common::{create_post, create_user, start};

#[tokio::test]
async fn test_migrations_are_idempotent() {
    let blog = start().await;
    assert!(pending_migrations(blog.db()).await.unwrap().is_empty());

    let again = migrate(blog.db()).await.unwrap();
    assert_eq!(again.applied, 0);
    assert_eq!(again.skipped, 4);
}

#[tokio::test]
async fn test_file_database_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = BlogConfig {
        database: DbConfig {
            dsn: format!("sqlite://{}", dir.path().join("data/blog.db").display()),
            ..DbConfig::default()
        },
        ..BlogConfig::default()
    };

    let post_id = {
        let blog = Blog::start(&cfg).await.unwrap();
        let user = create_user(blog.service(), "Ada").await;
        create_post(blog.service(), user.id, "Persisted").await.id
    };

    let blog = Blog::start(&cfg).await.unwrap();
    let post = blog.service().get_post(post_id, Trashed::Exclude).await.unwrap();
    assert_eq!(post.title, "Persisted");
    assert_eq!(migrate(blog.db()).await.unwrap().applied, 0);
}
