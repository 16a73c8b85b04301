use blog_sdk::{
    Comment, Commentable, CommentableEntity, Image, ImageOwner, ImageOwnerEntity, NewComment,
    NewImage, NewVideo, TaggableRef, Trashed, Video, VideoPatch,
};
use sea_orm::TransactionTrait;
use tracing::{info, instrument};

use super::BlogService;
use crate::domain::error::DomainError;
use crate::domain::repos::{
    CommentsRepository, ImagesRepository, PostsRepository, Repos, TaggablesRepository,
    UsersRepository, VideosRepository,
};
use crate::infra::storage::db::db_err;

fn require_non_empty(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(field, "must not be empty"));
    }
    Ok(())
}

impl<R: Repos> BlogService<R> {
    /// Attach an image to a user or post; the owner must exist.
    #[instrument(skip(self, new_image), fields(owner = ?new_image.owner))]
    pub async fn add_image(&self, new_image: NewImage) -> Result<Image, DomainError> {
        require_non_empty("url", &new_image.url)?;
        self.repos.images().create(&self.db, &new_image).await
    }

    pub async fn get_image(&self, id: i64) -> Result<Image, DomainError> {
        self.repos
            .images()
            .get(&self.db, id)
            .await?
            .ok_or_else(|| DomainError::not_found("Image", id))
    }

    pub async fn images_of(&self, owner: ImageOwner) -> Result<Vec<Image>, DomainError> {
        self.repos.images().for_owner(&self.db, owner).await
    }

    /// Morph-one: the owner's first image.
    pub async fn image_of(&self, owner: ImageOwner) -> Result<Option<Image>, DomainError> {
        self.repos.images().first_for_owner(&self.db, owner).await
    }

    pub async fn image_owner(&self, image_id: i64) -> Result<Option<ImageOwner>, DomainError> {
        self.repos.images().owner(&self.db, image_id).await
    }

    /// Morph-to: load the entity an image belongs to.
    pub async fn resolve_image_owner(
        &self,
        image_id: i64,
    ) -> Result<Option<ImageOwnerEntity>, DomainError> {
        let image = self.get_image(image_id).await?;
        let resolved = match image.owner {
            ImageOwner::User(id) => self
                .repos
                .users()
                .get(&self.db, id)
                .await?
                .map(ImageOwnerEntity::User),
            ImageOwner::Post(id) => self
                .repos
                .posts()
                .get(&self.db, id, Trashed::Include)
                .await?
                .map(ImageOwnerEntity::Post),
        };
        Ok(resolved)
    }

    pub async fn delete_image(&self, id: i64) -> Result<(), DomainError> {
        if self.repos.images().delete(&self.db, id).await? {
            Ok(())
        } else {
            Err(DomainError::not_found("Image", id))
        }
    }

    #[instrument(skip(self, new_video), fields(title = %new_video.title))]
    pub async fn create_video(&self, new_video: NewVideo) -> Result<Video, DomainError> {
        info!("Creating video");
        self.validate_name("title", &new_video.title)?;
        require_non_empty("url", &new_video.url)?;
        self.repos.videos().create(&self.db, &new_video).await
    }

    pub async fn get_video(&self, id: i64) -> Result<Video, DomainError> {
        self.repos
            .videos()
            .get(&self.db, id)
            .await?
            .ok_or_else(|| DomainError::not_found("Video", id))
    }

    pub async fn list_videos(&self) -> Result<Vec<Video>, DomainError> {
        self.repos.videos().list(&self.db).await
    }

    pub async fn update_video(&self, id: i64, patch: VideoPatch) -> Result<Video, DomainError> {
        if let Some(title) = &patch.title {
            self.validate_name("title", title)?;
        }
        if let Some(url) = &patch.url {
            require_non_empty("url", url)?;
        }
        self.repos.videos().update(&self.db, id, &patch).await
    }

    /// Delete a video with its comments and tag assignments.
    #[instrument(skip(self))]
    pub async fn delete_video(&self, id: i64) -> Result<(), DomainError> {
        info!("Deleting video");

        let txn = self.db.begin().await.map_err(db_err)?;

        if self.repos.videos().get(&txn, id).await?.is_none() {
            return Err(DomainError::not_found("Video", id));
        }
        self.repos
            .comments()
            .delete_for(&txn, Commentable::Video(id))
            .await?;
        self.repos
            .taggables()
            .delete_for(&txn, TaggableRef::Video(id))
            .await?;
        self.repos.videos().delete(&txn, id).await?;

        txn.commit().await.map_err(db_err)?;
        Ok(())
    }

    #[instrument(skip(self, new_comment), fields(commentable = ?new_comment.commentable))]
    pub async fn add_comment(&self, new_comment: NewComment) -> Result<Comment, DomainError> {
        require_non_empty("body", &new_comment.body)?;
        self.repos.comments().create(&self.db, &new_comment).await
    }

    pub async fn get_comment(&self, id: i64) -> Result<Comment, DomainError> {
        self.repos
            .comments()
            .get(&self.db, id)
            .await?
            .ok_or_else(|| DomainError::not_found("Comment", id))
    }

    pub async fn comments_on(&self, target: Commentable) -> Result<Vec<Comment>, DomainError> {
        self.repos.comments().for_commentable(&self.db, target).await
    }

    /// Morph-to: load the post or video a comment belongs to.
    pub async fn resolve_commentable(
        &self,
        comment_id: i64,
    ) -> Result<Option<CommentableEntity>, DomainError> {
        let comment = self
            .repos
            .comments()
            .get(&self.db, comment_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Comment", comment_id))?;
        let resolved = match comment.commentable {
            Commentable::Post(id) => self
                .repos
                .posts()
                .get(&self.db, id, Trashed::Include)
                .await?
                .map(CommentableEntity::Post),
            Commentable::Video(id) => self
                .repos
                .videos()
                .get(&self.db, id)
                .await?
                .map(CommentableEntity::Video),
        };
        Ok(resolved)
    }

    pub async fn delete_comment(&self, id: i64) -> Result<(), DomainError> {
        if self.repos.comments().delete(&self.db, id).await? {
            Ok(())
        } else {
            Err(DomainError::not_found("Comment", id))
        }
    }
}
