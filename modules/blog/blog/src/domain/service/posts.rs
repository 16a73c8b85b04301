use blog_sdk::{NewPost, Post, PostPatch, Trashed, User};
use sea_orm::TransactionTrait;
use tracing::{debug, info, instrument};

use super::BlogService;
use crate::domain::error::DomainError;
use crate::domain::repos::{PostsRepository, Repos};
use crate::infra::storage::db::db_err;

fn validate_min_to_read(min_to_read: i32) -> Result<(), DomainError> {
    if min_to_read < 0 {
        return Err(DomainError::validation("min_to_read", "must not be negative"));
    }
    Ok(())
}

/// An explicit slug wins; otherwise it is derived from the title.
fn resolve_slug(explicit: Option<&str>, title: &str) -> Result<String, DomainError> {
    let slug = match explicit {
        Some(slug) => slug.trim().to_owned(),
        None => slug::slugify(title),
    };
    if slug.is_empty() {
        return Err(DomainError::validation("slug", "must not be empty"));
    }
    Ok(slug)
}

impl<R: Repos> BlogService<R> {
    #[instrument(skip(self, new_post), fields(user_id = new_post.user_id))]
    pub async fn create_post(&self, new_post: NewPost) -> Result<Post, DomainError> {
        info!("Creating new post");

        self.validate_name("title", &new_post.title)?;
        validate_min_to_read(new_post.min_to_read)?;
        let slug = resolve_slug(new_post.slug.as_deref(), &new_post.title)?;
        self.get_user(new_post.user_id).await?;

        let post = self
            .repos
            .posts()
            .create(
                &self.db,
                &NewPost {
                    slug: Some(slug),
                    ..new_post
                },
            )
            .await?;

        info!(post_id = post.id, "Successfully created post");
        Ok(post)
    }

    #[instrument(skip(self))]
    pub async fn get_post(&self, id: i64, trashed: Trashed) -> Result<Post, DomainError> {
        debug!("Getting post by id");
        self.repos
            .posts()
            .get(&self.db, id, trashed)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))
    }

    pub async fn list_posts(&self, trashed: Trashed) -> Result<Vec<Post>, DomainError> {
        self.repos.posts().list(&self.db, trashed).await
    }

    /// Author of a post; `None` only when the post itself does not exist.
    pub async fn post_author(&self, post_id: i64) -> Result<Option<User>, DomainError> {
        self.repos.posts().author(&self.db, post_id).await
    }

    #[instrument(skip(self, patch))]
    pub async fn update_post(&self, id: i64, mut patch: PostPatch) -> Result<Post, DomainError> {
        info!("Updating post");

        if let Some(title) = &patch.title {
            self.validate_name("title", title)?;
        }
        if let Some(min_to_read) = patch.min_to_read {
            validate_min_to_read(min_to_read)?;
        }
        if let Some(slug) = patch.slug.take() {
            patch.slug = Some(resolve_slug(Some(&slug), "")?);
        }

        self.repos.posts().update(&self.db, id, &patch).await
    }

    /// Soft delete: the row stays and drops out of default queries.
    #[instrument(skip(self))]
    pub async fn delete_post(&self, id: i64) -> Result<(), DomainError> {
        info!("Soft deleting post");
        if self.repos.posts().soft_delete(&self.db, id).await? {
            Ok(())
        } else {
            Err(DomainError::not_found("Post", id))
        }
    }

    #[instrument(skip(self))]
    pub async fn restore_post(&self, id: i64) -> Result<Post, DomainError> {
        info!("Restoring post");
        if !self.repos.posts().restore(&self.db, id).await? {
            return Err(DomainError::not_found("Post", id));
        }
        self.get_post(id, Trashed::Exclude).await
    }

    /// Physically delete a post, trashed or not, with its images, comments
    /// and tag assignments. `post_tag` rows cascade in storage.
    #[instrument(skip(self))]
    pub async fn force_delete_post(&self, id: i64) -> Result<(), DomainError> {
        info!("Force deleting post");

        let txn = self.db.begin().await.map_err(db_err)?;

        if self
            .repos
            .posts()
            .get(&txn, id, Trashed::Include)
            .await?
            .is_none()
        {
            return Err(DomainError::not_found("Post", id));
        }
        self.purge_post_children(&txn, id).await?;
        self.repos.posts().force_delete(&txn, id).await?;

        txn.commit().await.map_err(db_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_is_derived_from_title() {
        let slug = resolve_slug(None, "Hello, World: A Post!").unwrap_or_default();
        assert_eq!(slug, "hello-world-a-post");
    }

    #[test]
    fn test_explicit_slug_wins() {
        let slug = resolve_slug(Some(" custom-slug "), "Ignored").unwrap_or_default();
        assert_eq!(slug, "custom-slug");
    }

    #[test]
    fn test_symbol_only_title_has_no_slug() {
        assert!(matches!(
            resolve_slug(None, "!!!"),
            Err(DomainError::Validation { .. })
        ));
    }

    #[test]
    fn test_negative_reading_time_is_rejected() {
        assert!(validate_min_to_read(-1).is_err());
        assert!(validate_min_to_read(0).is_ok());
    }
}
