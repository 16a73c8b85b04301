//! Domain service layer - business rules and transactions.
//!
//! `BlogService` owns the connection and the repository set. Its methods are
//! split per resource:
//! - `users` - users, contacts, companies, phone numbers and jobs
//! - `posts` - posts and their soft-delete lifecycle
//! - `tags` - tags, the `post_tag` pivot and polymorphic taggables
//! - `media` - images, videos and comments
//! - `countries` - countries and the posts reachable through their users
//!
//! Deleting an owner of polymorphic children (user, video, force-deleted post)
//! removes those children in the same transaction; the storage has no
//! foreign key to do it.

use std::sync::Arc;

use blog_db::DbConnTrait;
use blog_sdk::{Commentable, ImageOwner, TaggableRef};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::password::PasswordHasher;
use crate::domain::repos::{
    CommentsRepository, ImagesRepository, Repos, TaggablesRepository,
};

mod countries;
mod media;
mod posts;
mod tags;
mod users;

/// Configuration for the domain service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    pub max_name_length: usize,
    pub password_min_length: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_name_length: 255,
            password_min_length: 8,
        }
    }
}

/// Domain service with business rules for the blog.
pub struct BlogService<R: Repos> {
    db: DatabaseConnection,
    repos: Arc<R>,
    hasher: Arc<dyn PasswordHasher>,
    config: ServiceConfig,
}

impl<R: Repos> Clone for BlogService<R> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            repos: Arc::clone(&self.repos),
            hasher: Arc::clone(&self.hasher),
            config: self.config.clone(),
        }
    }
}

impl<R: Repos> BlogService<R> {
    pub fn new(
        db: DatabaseConnection,
        repos: R,
        hasher: Arc<dyn PasswordHasher>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            db,
            repos: Arc::new(repos),
            hasher,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Remove the polymorphic children of a post about to be physically deleted.
    async fn purge_post_children<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        post_id: i64,
    ) -> Result<(), DomainError> {
        let images = self
            .repos
            .images()
            .delete_for(conn, ImageOwner::Post(post_id))
            .await?;
        let comments = self
            .repos
            .comments()
            .delete_for(conn, Commentable::Post(post_id))
            .await?;
        let tags = self
            .repos
            .taggables()
            .delete_for(conn, TaggableRef::Post(post_id))
            .await?;
        tracing::debug!(post_id, images, comments, tags, "Purged post children");
        Ok(())
    }

    fn validate_name(&self, field: &str, value: &str) -> Result<(), DomainError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation(field, "must not be empty"));
        }
        let len = trimmed.chars().count();
        if len > self.config.max_name_length {
            return Err(DomainError::validation(
                field,
                format!(
                    "too long: {len} characters (max: {})",
                    self.config.max_name_length
                ),
            ));
        }
        Ok(())
    }
}

/// `local@domain.tld` with no whitespace and exactly one `@`.
fn validate_email(email: &str) -> Result<(), DomainError> {
    let Some((local, domain)) = email.split_once('@') else {
        return Err(DomainError::invalid_email(email));
    };
    let well_formed = !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.');
    if well_formed {
        Ok(())
    } else {
        Err(DomainError::invalid_email(email))
    }
}

/// Map a uniqueness conflict from storage onto a domain-specific error.
fn on_conflict(err: DomainError, f: impl FnOnce() -> DomainError) -> DomainError {
    match err {
        DomainError::Conflict { .. } => f(),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_addresses() {
        assert!(validate_email("ada@example.com").is_ok());
        assert!(validate_email("first.last+tag@mail.example.org").is_ok());
    }

    #[test]
    fn test_rejects_malformed_addresses() {
        for bad in [
            "",
            "plain",
            "@example.com",
            "ada@",
            "ada@localhost",
            "ada@@example.com",
            "ada@example.com.",
            "a da@example.com",
        ] {
            assert!(
                matches!(validate_email(bad), Err(DomainError::InvalidEmail { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_conflicts_are_remapped_others_pass_through() {
        let mapped = on_conflict(DomainError::conflict("UNIQUE failed"), || {
            DomainError::email_already_exists("a@b.io")
        });
        assert!(matches!(mapped, DomainError::EmailAlreadyExists { .. }));

        let kept = on_conflict(DomainError::database("boom"), || {
            DomainError::email_already_exists("a@b.io")
        });
        assert!(matches!(kept, DomainError::Database { .. }));
    }

    #[test]
    fn test_service_config_defaults() {
        let cfg = ServiceConfig::default();
        assert_eq!(cfg.max_name_length, 255);
        assert_eq!(cfg.password_min_length, 8);
    }
}
