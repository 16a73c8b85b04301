//! Synthetic post generation for seeding and tests.

use std::collections::HashSet;

use blog_sdk::{NewPost, Post};
use fake::Fake;
use fake::faker::boolean::en::Boolean;
use fake::faker::lorem::en::{Paragraph, Sentence};
use tracing::{debug, info};

use crate::domain::error::DomainError;
use crate::domain::repos::Repos;
use crate::domain::service::BlogService;

/// Draws before giving up on a fresh title.
const MAX_TITLE_ATTEMPTS: usize = 1_000;

/// Builds random posts. Titles are unique for the lifetime of one factory.
#[derive(Debug, Default)]
pub struct PostFactory {
    used_titles: HashSet<String>,
}

impl PostFactory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attributes of one post authored by a user id drawn from `1..=user_count`.
    ///
    /// # Errors
    /// `DomainError::NoUsers` when `user_count` is zero; `Validation` when no
    /// unused title could be drawn.
    pub fn definition(&mut self, user_count: u64) -> Result<NewPost, DomainError> {
        if user_count == 0 {
            return Err(DomainError::NoUsers);
        }
        let upper = i64::try_from(user_count)
            .map_err(|_| DomainError::validation("user_count", "out of range"))?;
        let user_id = (1..=upper).fake::<i64>();
        self.build(user_id)
    }

    /// Like [`Self::definition`], drawing the author from known user ids so
    /// gaps left by deleted users are never picked.
    ///
    /// # Errors
    /// `DomainError::NoUsers` when `user_ids` is empty.
    pub fn definition_among(&mut self, user_ids: &[i64]) -> Result<NewPost, DomainError> {
        if user_ids.is_empty() {
            return Err(DomainError::NoUsers);
        }
        let pick = (0..user_ids.len()).fake::<usize>();
        let user_id = user_ids.get(pick).copied().ok_or(DomainError::NoUsers)?;
        self.build(user_id)
    }

    /// Insert `n` generated posts through the service.
    ///
    /// # Errors
    /// `DomainError::NoUsers` when the users table is empty, or any error of
    /// `BlogService::create_post`.
    pub async fn create_many<R: Repos>(
        &mut self,
        service: &BlogService<R>,
        n: usize,
    ) -> Result<Vec<Post>, DomainError> {
        let user_ids = service.user_ids().await?;
        if user_ids.is_empty() {
            return Err(DomainError::NoUsers);
        }

        let mut posts = Vec::with_capacity(n);
        for _ in 0..n {
            let attrs = self.definition_among(&user_ids)?;
            posts.push(service.create_post(attrs).await?);
        }

        info!(count = posts.len(), users = user_ids.len(), "Generated posts");
        Ok(posts)
    }

    fn build(&mut self, user_id: i64) -> Result<NewPost, DomainError> {
        let title = self.unique_title()?;
        let slug = slug::slugify(&title);
        debug!(user_id, %slug, "Post definition");

        Ok(NewPost {
            user_id,
            title,
            slug: Some(slug),
            excerpt: Sentence(6..12).fake(),
            description: Paragraph(2..5).fake(),
            is_published: Boolean(50).fake(),
            min_to_read: (0..10).fake::<i32>(),
        })
    }

    fn unique_title(&mut self) -> Result<String, DomainError> {
        for _ in 0..MAX_TITLE_ATTEMPTS {
            let title: String = Sentence(3..8).fake();
            if self.used_titles.insert(title.clone()) {
                return Ok(title);
            }
        }
        Err(DomainError::validation(
            "title",
            "exhausted attempts to generate a unique title",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_stays_within_user_range() {
        let mut factory = PostFactory::new();
        for _ in 0..200 {
            let post = factory
                .definition(3)
                .unwrap_or_else(|e| panic!("definition failed: {e}"));
            assert!((1..=3).contains(&post.user_id));
            assert!((0..=9).contains(&post.min_to_read));
            assert_eq!(post.slug.as_deref(), Some(slug::slugify(&post.title).as_str()));
            assert!(!post.excerpt.is_empty());
            assert!(!post.description.is_empty());
        }
    }

    #[test]
    fn test_titles_are_unique_per_factory() {
        let mut factory = PostFactory::new();
        let mut seen = HashSet::new();
        for _ in 0..100 {
            let post = factory.definition(1).unwrap_or_else(|e| panic!("{e}"));
            assert!(seen.insert(post.title));
        }
    }

    #[test]
    fn test_zero_users_is_an_error() {
        assert!(matches!(
            PostFactory::new().definition(0),
            Err(DomainError::NoUsers)
        ));
        assert!(matches!(
            PostFactory::new().definition_among(&[]),
            Err(DomainError::NoUsers)
        ));
    }

    #[test]
    fn test_definition_among_picks_known_ids() {
        let mut factory = PostFactory::new();
        for _ in 0..50 {
            let post = factory.definition_among(&[4, 9]).unwrap_or_else(|e| panic!("{e}"));
            assert!(post.user_id == 4 || post.user_id == 9);
        }
    }
}
