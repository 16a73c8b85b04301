use async_trait::async_trait;
use blog_db::DbConnTrait;
use blog_sdk::{NewTag, Post, SyncChanges, Tag, TagPatch, TaggableRef, Trashed, Video};

use crate::domain::error::DomainError;

#[async_trait]
pub trait TagsRepository: Send + Sync {
    async fn create<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        new_tag: &NewTag,
    ) -> Result<Tag, DomainError>;

    async fn get<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<Option<Tag>, DomainError>;

    async fn find_by_slug<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        slug: &str,
    ) -> Result<Option<Tag>, DomainError>;

    async fn list<C: DbConnTrait + Send + Sync>(&self, conn: &C) -> Result<Vec<Tag>, DomainError>;

    async fn update<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
        patch: &TagPatch,
    ) -> Result<Tag, DomainError>;

    /// Junction rows in `post_tag` and `taggables` cascade; posts and videos stay.
    async fn delete<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<bool, DomainError>;
}

/// The direct post/tag many-to-many over the `post_tag` pivot.
#[async_trait]
pub trait PostTagRepository: Send + Sync {
    /// Link tags to a post, skipping pairs that already exist.
    /// Returns the number of rows inserted.
    async fn attach<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        post_id: i64,
        tag_ids: &[i64],
    ) -> Result<u64, DomainError>;

    /// Unlink the given tags. Returns the number of rows removed.
    async fn detach<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        post_id: i64,
        tag_ids: &[i64],
    ) -> Result<u64, DomainError>;

    async fn detach_all<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        post_id: i64,
    ) -> Result<u64, DomainError>;

    /// Make `tag_ids` the post's exact tag set.
    async fn sync<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        post_id: i64,
        tag_ids: &[i64],
    ) -> Result<SyncChanges, DomainError>;

    async fn tags_of_post<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        post_id: i64,
    ) -> Result<Vec<Tag>, DomainError>;

    async fn posts_of_tag<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        tag_id: i64,
        trashed: Trashed,
    ) -> Result<Vec<Post>, DomainError>;
}

/// The polymorphic tag many-to-many over `taggables`.
#[async_trait]
pub trait TaggablesRepository: Send + Sync {
    /// Idempotent: returns false when the pair already existed.
    async fn attach<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        tag_id: i64,
        target: TaggableRef,
    ) -> Result<bool, DomainError>;

    async fn detach<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        tag_id: i64,
        target: TaggableRef,
    ) -> Result<bool, DomainError>;

    async fn tags_for<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        target: TaggableRef,
    ) -> Result<Vec<Tag>, DomainError>;

    async fn taggables_of<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        tag_id: i64,
    ) -> Result<Vec<TaggableRef>, DomainError>;

    async fn posts_for_tag<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        tag_id: i64,
        trashed: Trashed,
    ) -> Result<Vec<Post>, DomainError>;

    async fn videos_for_tag<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        tag_id: i64,
    ) -> Result<Vec<Video>, DomainError>;

    /// Remove every tag assignment of a target being deleted.
    async fn delete_for<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        target: TaggableRef,
    ) -> Result<u64, DomainError>;
}
