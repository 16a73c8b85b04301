use async_trait::async_trait;
use blog_db::DbConnTrait;
use blog_sdk::{NewPost, Post, PostPatch, Trashed, User};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Select, Set,
};
use time::OffsetDateTime;

use crate::domain::error::DomainError;
use crate::domain::repos::PostsRepository;
use crate::infra::storage::db::db_err;
use crate::infra::storage::entity::{post, user};

/// Apply the soft-delete scope to any post query.
pub(crate) fn scope_trashed(query: Select<post::Entity>, trashed: Trashed) -> Select<post::Entity> {
    match trashed {
        Trashed::Exclude => query.filter(post::Column::DeletedAt.is_null()),
        Trashed::Include => query,
        Trashed::Only => query.filter(post::Column::DeletedAt.is_not_null()),
    }
}

#[derive(Clone, Default)]
pub struct OrmPostsRepository;

#[async_trait]
impl PostsRepository for OrmPostsRepository {
    async fn create<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        new_post: &NewPost,
    ) -> Result<Post, DomainError> {
        let now = OffsetDateTime::now_utc();
        let slug = new_post
            .slug
            .clone()
            .unwrap_or_else(|| slug::slugify(&new_post.title));

        let saved = post::ActiveModel {
            user_id: Set(new_post.user_id),
            title: Set(new_post.title.clone()),
            slug: Set(slug),
            excerpt: Set(new_post.excerpt.clone()),
            description: Set(new_post.description.clone()),
            is_published: Set(new_post.is_published),
            min_to_read: Set(new_post.min_to_read),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
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
        trashed: Trashed,
    ) -> Result<Option<Post>, DomainError> {
        let found = scope_trashed(post::Entity::find_by_id(id), trashed)
            .one(conn)
            .await
            .map_err(db_err)?;
        Ok(found.map(Into::into))
    }

    async fn list<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        trashed: Trashed,
    ) -> Result<Vec<Post>, DomainError> {
        let rows = scope_trashed(post::Entity::find(), trashed)
            .order_by_asc(post::Column::Id)
            .all(conn)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_by_user<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i64,
        trashed: Trashed,
    ) -> Result<Vec<Post>, DomainError> {
        let query = post::Entity::find().filter(post::Column::UserId.eq(user_id));
        let rows = scope_trashed(query, trashed)
            .order_by_asc(post::Column::Id)
            .all(conn)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn author<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        post_id: i64,
    ) -> Result<Option<User>, DomainError> {
        let found = user::Entity::find()
            .inner_join(post::Entity)
            .filter(post::Column::Id.eq(post_id))
            .one(conn)
            .await
            .map_err(db_err)?;
        Ok(found.map(Into::into))
    }

    async fn update<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
        patch: &PostPatch,
    ) -> Result<Post, DomainError> {
        let existing = scope_trashed(post::Entity::find_by_id(id), Trashed::Exclude)
            .one(conn)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("Post", id))?;

        let mut m: post::ActiveModel = existing.into();
        if let Some(title) = &patch.title {
            m.title = Set(title.clone());
        }
        if let Some(slug) = &patch.slug {
            m.slug = Set(slug.clone());
        }
        if let Some(excerpt) = &patch.excerpt {
            m.excerpt = Set(excerpt.clone());
        }
        if let Some(description) = &patch.description {
            m.description = Set(description.clone());
        }
        if let Some(is_published) = patch.is_published {
            m.is_published = Set(is_published);
        }
        if let Some(min_to_read) = patch.min_to_read {
            m.min_to_read = Set(min_to_read);
        }
        m.updated_at = Set(OffsetDateTime::now_utc());

        let updated = m.update(conn).await.map_err(db_err)?;
        Ok(updated.into())
    }

    async fn soft_delete<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<bool, DomainError> {
        let now = OffsetDateTime::now_utc();
        let result = post::Entity::update_many()
            .col_expr(post::Column::DeletedAt, Expr::value(Some(now)))
            .col_expr(post::Column::UpdatedAt, Expr::value(now))
            .filter(post::Column::Id.eq(id))
            .filter(post::Column::DeletedAt.is_null())
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn restore<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<bool, DomainError> {
        let result = post::Entity::update_many()
            .col_expr(
                post::Column::DeletedAt,
                Expr::value(Option::<OffsetDateTime>::None),
            )
            .col_expr(post::Column::UpdatedAt, Expr::value(OffsetDateTime::now_utc()))
            .filter(post::Column::Id.eq(id))
            .filter(post::Column::DeletedAt.is_not_null())
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn force_delete<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<bool, DomainError> {
        let result = post::Entity::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }
}
