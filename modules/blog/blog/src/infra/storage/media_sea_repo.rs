use async_trait::async_trait;
use blog_db::DbConnTrait;
use blog_sdk::{
    Comment, Commentable, Image, ImageOwner, NewComment, NewImage, NewVideo, Video, VideoPatch,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use time::OffsetDateTime;

use crate::domain::error::DomainError;
use crate::domain::repos::{CommentsRepository, ImagesRepository, VideosRepository};
use crate::infra::storage::db::db_err;
use crate::infra::storage::entity::{comment, image, video};
use crate::infra::storage::mapper::morph_parts;
use crate::infra::storage::owners::ensure_owner_exists;

fn owned_images(owner: ImageOwner) -> sea_orm::Condition {
    let (kind, id) = morph_parts(owner);
    sea_orm::Condition::all()
        .add(image::Column::ImageableType.eq(kind))
        .add(image::Column::ImageableId.eq(id))
}

fn comments_on(target: Commentable) -> sea_orm::Condition {
    let (kind, id) = morph_parts(target);
    sea_orm::Condition::all()
        .add(comment::Column::CommentableType.eq(kind))
        .add(comment::Column::CommentableId.eq(id))
}

#[derive(Clone, Default)]
pub struct OrmImagesRepository;

#[async_trait]
impl ImagesRepository for OrmImagesRepository {
    async fn create<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        new_image: &NewImage,
    ) -> Result<Image, DomainError> {
        ensure_owner_exists(conn, new_image.owner.into()).await?;

        let (kind, id) = morph_parts(new_image.owner);
        let saved = image::ActiveModel {
            url: Set(new_image.url.clone()),
            imageable_type: Set(kind),
            imageable_id: Set(id),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(db_err)?;
        saved.try_into()
    }

    async fn get<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<Option<Image>, DomainError> {
        image::Entity::find_by_id(id)
            .one(conn)
            .await
            .map_err(db_err)?
            .map(Image::try_from)
            .transpose()
    }

    async fn for_owner<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        owner: ImageOwner,
    ) -> Result<Vec<Image>, DomainError> {
        let rows = image::Entity::find()
            .filter(owned_images(owner))
            .order_by_asc(image::Column::Id)
            .all(conn)
            .await
            .map_err(db_err)?;
        rows.into_iter().map(Image::try_from).collect()
    }

    async fn first_for_owner<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        owner: ImageOwner,
    ) -> Result<Option<Image>, DomainError> {
        image::Entity::find()
            .filter(owned_images(owner))
            .order_by_asc(image::Column::Id)
            .one(conn)
            .await
            .map_err(db_err)?
            .map(Image::try_from)
            .transpose()
    }

    async fn owner<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        image_id: i64,
    ) -> Result<Option<ImageOwner>, DomainError> {
        Ok(self.get(conn, image_id).await?.map(|image| image.owner))
    }

    async fn delete<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<bool, DomainError> {
        let result = image::Entity::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn delete_for<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        owner: ImageOwner,
    ) -> Result<u64, DomainError> {
        let result = image::Entity::delete_many()
            .filter(owned_images(owner))
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected)
    }
}

#[derive(Clone, Default)]
pub struct OrmCommentsRepository;

#[async_trait]
impl CommentsRepository for OrmCommentsRepository {
    async fn create<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        new_comment: &NewComment,
    ) -> Result<Comment, DomainError> {
        ensure_owner_exists(conn, new_comment.commentable.into()).await?;

        let (kind, id) = morph_parts(new_comment.commentable);
        let saved = comment::ActiveModel {
            body: Set(new_comment.body.clone()),
            commentable_type: Set(kind),
            commentable_id: Set(id),
            created_at: Set(OffsetDateTime::now_utc()),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(db_err)?;
        saved.try_into()
    }

    async fn get<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<Option<Comment>, DomainError> {
        comment::Entity::find_by_id(id)
            .one(conn)
            .await
            .map_err(db_err)?
            .map(Comment::try_from)
            .transpose()
    }

    async fn for_commentable<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        target: Commentable,
    ) -> Result<Vec<Comment>, DomainError> {
        let rows = comment::Entity::find()
            .filter(comments_on(target))
            .order_by_asc(comment::Column::Id)
            .all(conn)
            .await
            .map_err(db_err)?;
        rows.into_iter().map(Comment::try_from).collect()
    }

    async fn delete<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<bool, DomainError> {
        let result = comment::Entity::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn delete_for<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        target: Commentable,
    ) -> Result<u64, DomainError> {
        let result = comment::Entity::delete_many()
            .filter(comments_on(target))
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected)
    }
}

#[derive(Clone, Default)]
pub struct OrmVideosRepository;

#[async_trait]
impl VideosRepository for OrmVideosRepository {
    async fn create<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        new_video: &NewVideo,
    ) -> Result<Video, DomainError> {
        let now = OffsetDateTime::now_utc();
        let saved = video::ActiveModel {
            title: Set(new_video.title.clone()),
            url: Set(new_video.url.clone()),
            description: Set(new_video.description.clone()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(db_err)?;
        Ok(saved.into())
    }

    async fn get<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<Option<Video>, DomainError> {
        let found = video::Entity::find_by_id(id)
            .one(conn)
            .await
            .map_err(db_err)?;
        Ok(found.map(Into::into))
    }

    async fn list<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
    ) -> Result<Vec<Video>, DomainError> {
        let rows = video::Entity::find()
            .order_by_asc(video::Column::Id)
            .all(conn)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
        patch: &VideoPatch,
    ) -> Result<Video, DomainError> {
        let existing = video::Entity::find_by_id(id)
            .one(conn)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("Video", id))?;

        let mut m: video::ActiveModel = existing.into();
        if let Some(title) = &patch.title {
            m.title = Set(title.clone());
        }
        if let Some(url) = &patch.url {
            m.url = Set(url.clone());
        }
        if let Some(description) = &patch.description {
            m.description = Set(description.clone());
        }
        m.updated_at = Set(OffsetDateTime::now_utc());

        let updated = m.update(conn).await.map_err(db_err)?;
        Ok(updated.into())
    }

    async fn delete<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<bool, DomainError> {
        let result = video::Entity::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }
}
