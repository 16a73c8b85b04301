use std::collections::BTreeSet;

use async_trait::async_trait;
use blog_db::DbConnTrait;
use blog_sdk::{NewTag, Post, SyncChanges, Tag, TagPatch, TaggableRef, Trashed, Video};
use sea_orm::sea_query::Query;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::domain::error::DomainError;
use crate::domain::repos::{PostTagRepository, TaggablesRepository, TagsRepository};
use crate::infra::storage::db::db_err;
use crate::infra::storage::entity::{MorphKind, post, post_tag, tag, taggable, video};
use crate::infra::storage::mapper::morph_parts;
use crate::infra::storage::owners::ensure_owner_exists;
use crate::infra::storage::posts_sea_repo::scope_trashed;

#[derive(Clone, Default)]
pub struct OrmTagsRepository;

#[async_trait]
impl TagsRepository for OrmTagsRepository {
    async fn create<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        new_tag: &NewTag,
    ) -> Result<Tag, DomainError> {
        let slug = new_tag
            .slug
            .clone()
            .unwrap_or_else(|| slug::slugify(&new_tag.name));
        let saved = tag::ActiveModel {
            name: Set(new_tag.name.clone()),
            slug: Set(slug),
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
    ) -> Result<Option<Tag>, DomainError> {
        let found = tag::Entity::find_by_id(id)
            .one(conn)
            .await
            .map_err(db_err)?;
        Ok(found.map(Into::into))
    }

    async fn find_by_slug<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        slug: &str,
    ) -> Result<Option<Tag>, DomainError> {
        let found = tag::Entity::find()
            .filter(tag::Column::Slug.eq(slug))
            .one(conn)
            .await
            .map_err(db_err)?;
        Ok(found.map(Into::into))
    }

    async fn list<C: DbConnTrait + Send + Sync>(&self, conn: &C) -> Result<Vec<Tag>, DomainError> {
        let rows = tag::Entity::find()
            .order_by_asc(tag::Column::Id)
            .all(conn)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
        patch: &TagPatch,
    ) -> Result<Tag, DomainError> {
        let existing = tag::Entity::find_by_id(id)
            .one(conn)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("Tag", id))?;

        let mut m: tag::ActiveModel = existing.into();
        if let Some(name) = &patch.name {
            m.name = Set(name.clone());
        }
        if let Some(slug) = &patch.slug {
            m.slug = Set(slug.clone());
        }
        let updated = m.update(conn).await.map_err(db_err)?;
        Ok(updated.into())
    }

    async fn delete<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<bool, DomainError> {
        let result = tag::Entity::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }
}

#[derive(Clone, Default)]
pub struct OrmPostTagRepository;

impl OrmPostTagRepository {
    async fn current_tag_ids<C: DbConnTrait + Send + Sync>(
        conn: &C,
        post_id: i64,
    ) -> Result<Vec<i64>, DomainError> {
        post_tag::Entity::find()
            .select_only()
            .column(post_tag::Column::TagId)
            .filter(post_tag::Column::PostId.eq(post_id))
            .order_by_asc(post_tag::Column::TagId)
            .into_tuple::<i64>()
            .all(conn)
            .await
            .map_err(db_err)
    }
}

#[async_trait]
impl PostTagRepository for OrmPostTagRepository {
    async fn attach<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        post_id: i64,
        tag_ids: &[i64],
    ) -> Result<u64, DomainError> {
        if tag_ids.is_empty() {
            return Ok(0);
        }

        let mut seen: BTreeSet<i64> = Self::current_tag_ids(conn, post_id)
            .await?
            .into_iter()
            .collect();
        let fresh: Vec<post_tag::ActiveModel> = tag_ids
            .iter()
            .copied()
            .filter(|tag_id| seen.insert(*tag_id))
            .map(|tag_id| post_tag::ActiveModel {
                post_id: Set(post_id),
                tag_id: Set(tag_id),
            })
            .collect();

        if fresh.is_empty() {
            return Ok(0);
        }

        post_tag::Entity::insert_many(fresh)
            .exec_without_returning(conn)
            .await
            .map_err(db_err)
    }

    async fn detach<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        post_id: i64,
        tag_ids: &[i64],
    ) -> Result<u64, DomainError> {
        if tag_ids.is_empty() {
            return Ok(0);
        }

        let result = post_tag::Entity::delete_many()
            .filter(post_tag::Column::PostId.eq(post_id))
            .filter(post_tag::Column::TagId.is_in(tag_ids.iter().copied()))
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected)
    }

    async fn detach_all<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        post_id: i64,
    ) -> Result<u64, DomainError> {
        let result = post_tag::Entity::delete_many()
            .filter(post_tag::Column::PostId.eq(post_id))
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected)
    }

    async fn sync<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        post_id: i64,
        tag_ids: &[i64],
    ) -> Result<SyncChanges, DomainError> {
        let current: BTreeSet<i64> = Self::current_tag_ids(conn, post_id)
            .await?
            .into_iter()
            .collect();
        let desired: BTreeSet<i64> = tag_ids.iter().copied().collect();

        let changes = SyncChanges {
            attached: desired.difference(&current).copied().collect(),
            detached: current.difference(&desired).copied().collect(),
        };

        self.detach(conn, post_id, &changes.detached).await?;
        self.attach(conn, post_id, &changes.attached).await?;
        Ok(changes)
    }

    async fn tags_of_post<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        post_id: i64,
    ) -> Result<Vec<Tag>, DomainError> {
        let rows = tag::Entity::find()
            .inner_join(post_tag::Entity)
            .filter(post_tag::Column::PostId.eq(post_id))
            .order_by_asc(tag::Column::Id)
            .all(conn)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn posts_of_tag<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        tag_id: i64,
        trashed: Trashed,
    ) -> Result<Vec<Post>, DomainError> {
        let query = post::Entity::find()
            .inner_join(post_tag::Entity)
            .filter(post_tag::Column::TagId.eq(tag_id));
        let rows = scope_trashed(query, trashed)
            .order_by_asc(post::Column::Id)
            .all(conn)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[derive(Clone, Default)]
pub struct OrmTaggablesRepository;

fn taggable_filter(tag_id: i64, target: TaggableRef) -> sea_orm::Condition {
    let (kind, id) = morph_parts(target);
    sea_orm::Condition::all()
        .add(taggable::Column::TagId.eq(tag_id))
        .add(taggable::Column::TaggableType.eq(kind))
        .add(taggable::Column::TaggableId.eq(id))
}

/// `SELECT taggable_id FROM taggables WHERE tag_id = ? AND taggable_type = ?`
fn tagged_ids(tag_id: i64, kind: MorphKind) -> sea_orm::sea_query::SelectStatement {
    Query::select()
        .column(taggable::Column::TaggableId)
        .from(taggable::Entity)
        .and_where(taggable::Column::TagId.eq(tag_id))
        .and_where(taggable::Column::TaggableType.eq(kind))
        .to_owned()
}

#[async_trait]
impl TaggablesRepository for OrmTaggablesRepository {
    async fn attach<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        tag_id: i64,
        target: TaggableRef,
    ) -> Result<bool, DomainError> {
        ensure_owner_exists(conn, target.into()).await?;

        let existing = taggable::Entity::find()
            .filter(taggable_filter(tag_id, target))
            .one(conn)
            .await
            .map_err(db_err)?;
        if existing.is_some() {
            return Ok(false);
        }

        let (kind, id) = morph_parts(target);
        taggable::Entity::insert(taggable::ActiveModel {
            tag_id: Set(tag_id),
            taggable_type: Set(kind),
            taggable_id: Set(id),
        })
        .exec_without_returning(conn)
        .await
        .map_err(db_err)?;
        Ok(true)
    }

    async fn detach<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        tag_id: i64,
        target: TaggableRef,
    ) -> Result<bool, DomainError> {
        let result = taggable::Entity::delete_many()
            .filter(taggable_filter(tag_id, target))
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn tags_for<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        target: TaggableRef,
    ) -> Result<Vec<Tag>, DomainError> {
        let (kind, id) = morph_parts(target);
        let rows = tag::Entity::find()
            .inner_join(taggable::Entity)
            .filter(taggable::Column::TaggableType.eq(kind))
            .filter(taggable::Column::TaggableId.eq(id))
            .order_by_asc(tag::Column::Id)
            .all(conn)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn taggables_of<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        tag_id: i64,
    ) -> Result<Vec<TaggableRef>, DomainError> {
        let rows = taggable::Entity::find()
            .filter(taggable::Column::TagId.eq(tag_id))
            .order_by_asc(taggable::Column::TaggableType)
            .order_by_asc(taggable::Column::TaggableId)
            .all(conn)
            .await
            .map_err(db_err)?;
        rows.into_iter().map(TaggableRef::try_from).collect()
    }

    async fn posts_for_tag<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        tag_id: i64,
        trashed: Trashed,
    ) -> Result<Vec<Post>, DomainError> {
        let query = post::Entity::find()
            .filter(post::Column::Id.in_subquery(tagged_ids(tag_id, MorphKind::Post)));
        let rows = scope_trashed(query, trashed)
            .order_by_asc(post::Column::Id)
            .all(conn)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn videos_for_tag<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        tag_id: i64,
    ) -> Result<Vec<Video>, DomainError> {
        let rows = video::Entity::find()
            .filter(video::Column::Id.in_subquery(tagged_ids(tag_id, MorphKind::Video)))
            .order_by_asc(video::Column::Id)
            .all(conn)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn delete_for<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        target: TaggableRef,
    ) -> Result<u64, DomainError> {
        let (kind, id) = morph_parts(target);
        let result = taggable::Entity::delete_many()
            .filter(taggable::Column::TaggableType.eq(kind))
            .filter(taggable::Column::TaggableId.eq(id))
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected)
    }
}
