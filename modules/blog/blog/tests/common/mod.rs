#![allow(clippy::unwrap_used, clippy::expect_used, dead_code)]

//! Common test utilities for blog integration tests

use blog::config::BlogConfig;
use blog::{Blog, ConcreteBlogService, NewPost, NewUser, Post, User};

/// A fresh in-memory module with all migrations applied.
pub async fn start() -> Blog {
    Blog::start(&BlogConfig::default())
        .await
        .expect("in-memory blog module should start")
}

pub async fn create_user(service: &ConcreteBlogService, name: &str) -> User {
    service
        .create_user(NewUser {
            country_id: None,
            name: name.to_owned(),
            email: format!("{}@example.com", name.to_lowercase()),
            password: "correct horse battery".to_owned(),
            balance: 0,
        })
        .await
        .unwrap()
}

pub fn new_post(user_id: i64, title: &str) -> NewPost {
    NewPost {
        user_id,
        title: title.to_owned(),
        slug: None,
        excerpt: format!("{title} excerpt"),
        description: format!("{title} description"),
        is_published: true,
        min_to_read: 3,
    }
}

pub async fn create_post(service: &ConcreteBlogService, user_id: i64, title: &str) -> Post {
    service.create_post(new_post(user_id, title)).await.unwrap()
}

pub fn ids<T>(items: &[T], id: impl Fn(&T) -> i64) -> Vec<i64> {
    items.iter().map(id).collect()
}
