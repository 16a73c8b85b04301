use async_trait::async_trait;
use blog_db::DbConnTrait;
use blog_sdk::{NewPost, Post, PostPatch, Trashed, User};

use crate::domain::error::DomainError;

/// Repository trait for posts. Every read takes a `Trashed` filter; the
/// default `Trashed::Exclude` hides soft-deleted rows.
#[async_trait]
pub trait PostsRepository: Send + Sync {
    /// Insert a post. An absent slug is derived from the title.
    async fn create<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        new_post: &NewPost,
    ) -> Result<Post, DomainError>;

    async fn get<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
        trashed: Trashed,
    ) -> Result<Option<Post>, DomainError>;

    async fn list<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        trashed: Trashed,
    ) -> Result<Vec<Post>, DomainError>;

    /// The user's posts ordered by id ascending.
    async fn list_by_user<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i64,
        trashed: Trashed,
    ) -> Result<Vec<Post>, DomainError>;

    /// Owning user of a post, trashed or not.
    async fn author<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        post_id: i64,
    ) -> Result<Option<User>, DomainError>;

    /// Updates a live post; trashed posts must be restored first.
    async fn update<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
        patch: &PostPatch,
    ) -> Result<Post, DomainError>;

    /// Stamp `deleted_at`. Returns false when the post is missing or already trashed.
    async fn soft_delete<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<bool, DomainError>;

    /// Clear `deleted_at`. Returns false when the post is missing or not trashed.
    async fn restore<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<bool, DomainError>;

    /// Physically remove the row; `post_tag` rows cascade.
    async fn force_delete<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<bool, DomainError>;
}
