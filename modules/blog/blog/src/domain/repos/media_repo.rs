use async_trait::async_trait;
use blog_db::DbConnTrait;
use blog_sdk::{
    Comment, Commentable, Image, ImageOwner, NewComment, NewImage, NewVideo, Video, VideoPatch,
};

use crate::domain::error::DomainError;

/// Images are owned by exactly one User or Post.
#[async_trait]
pub trait ImagesRepository: Send + Sync {
    /// Fails with `DomainError::OwnerNotFound` when the owner row is missing.
    async fn create<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        new_image: &NewImage,
    ) -> Result<Image, DomainError>;

    async fn get<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<Option<Image>, DomainError>;

    async fn for_owner<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        owner: ImageOwner,
    ) -> Result<Vec<Image>, DomainError>;

    async fn first_for_owner<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        owner: ImageOwner,
    ) -> Result<Option<Image>, DomainError>;

    async fn owner<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        image_id: i64,
    ) -> Result<Option<ImageOwner>, DomainError>;

    async fn delete<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<bool, DomainError>;

    async fn delete_for<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        owner: ImageOwner,
    ) -> Result<u64, DomainError>;
}

#[async_trait]
pub trait CommentsRepository: Send + Sync {
    async fn create<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        new_comment: &NewComment,
    ) -> Result<Comment, DomainError>;

    async fn get<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<Option<Comment>, DomainError>;

    /// Comments of one target, oldest first.
    async fn for_commentable<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        target: Commentable,
    ) -> Result<Vec<Comment>, DomainError>;

    async fn delete<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<bool, DomainError>;

    async fn delete_for<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        target: Commentable,
    ) -> Result<u64, DomainError>;
}

#[async_trait]
pub trait VideosRepository: Send + Sync {
    async fn create<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        new_video: &NewVideo,
    ) -> Result<Video, DomainError>;

    async fn get<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<Option<Video>, DomainError>;

    async fn list<C: DbConnTrait + Send + Sync>(&self, conn: &C)
    -> Result<Vec<Video>, DomainError>;

    async fn update<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
        patch: &VideoPatch,
    ) -> Result<Video, DomainError>;

    async fn delete<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<bool, DomainError>;
}
