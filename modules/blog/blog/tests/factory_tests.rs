#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Integration tests for the post factory against a live schema

mod common;

use blog::Trashed;
use blog::domain::error::DomainError;
use blog::domain::factory::PostFactory;
use common::{create_user, start};

#[tokio::test]
async fn test_create_many_without_users_fails() {
    let blog = start().await;
    let mut factory = PostFactory::new();

    let err = factory.create_many(blog.service(), 3).await.unwrap_err();
    assert!(matches!(err, DomainError::NoUsers));
    assert!(blog.service().list_posts(Trashed::Include).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_many_assigns_existing_authors() {
    let blog = start().await;
    let service = blog.service();
    let ada = create_user(service, "Ada").await;
    let bob = create_user(service, "Bob").await;
    let mut factory = PostFactory::new();

    let posts = factory.create_many(service, 12).await.unwrap();

    assert_eq!(posts.len(), 12);
    assert!(posts
        .iter()
        .all(|p| p.user_id == ada.id || p.user_id == bob.id));
    assert!(posts.iter().all(|p| (0..10).contains(&p.min_to_read)));
    assert!(posts.iter().all(|p| !p.slug.is_empty()));
    assert_eq!(service.list_posts(Trashed::Exclude).await.unwrap().len(), 12);
}

#[tokio::test]
async fn test_definition_uses_dense_user_range() {
    let blog = start().await;
    let service = blog.service();
    create_user(service, "Cy").await;
    create_user(service, "Di").await;
    let count = service.count_users().await.unwrap();
    let mut factory = PostFactory::new();

    for _ in 0..20 {
        let attrs = factory.definition(count).unwrap();
        assert!((1..=2).contains(&attrs.user_id));
        service.create_post(attrs).await.unwrap();
    }
}
