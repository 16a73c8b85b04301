use async_trait::async_trait;
use blog_db::DbConnTrait;
use blog_sdk::{Job, NewJob, OfManyKey};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, Order, QueryFilter, QueryOrder, Select, Set,
};
use time::{OffsetDateTime, UtcOffset};

use crate::domain::error::DomainError;
use crate::domain::repos::JobsRepository;
use crate::infra::storage::db::db_err;
use crate::infra::storage::entity::job;

#[derive(Clone, Default)]
pub struct OrmJobsRepository;

/// Order a user's jobs by the one-of-many key. `created_at` ties fall back
/// to `id` in the same direction so the pick is deterministic.
fn ordered_by(query: Select<job::Entity>, key: OfManyKey, dir: Order) -> Select<job::Entity> {
    match key {
        OfManyKey::Id => query.order_by(job::Column::Id, dir),
        OfManyKey::CreatedAt => query
            .order_by(job::Column::CreatedAt, dir.clone())
            .order_by(job::Column::Id, dir),
    }
}

impl OrmJobsRepository {
    async fn one_of_many<C: DbConnTrait + Send + Sync>(
        conn: &C,
        user_id: i64,
        key: OfManyKey,
        dir: Order,
    ) -> Result<Option<Job>, DomainError> {
        let base = job::Entity::find().filter(job::Column::UserId.eq(user_id));
        let found = ordered_by(base, key, dir)
            .one(conn)
            .await
            .map_err(db_err)?;
        Ok(found.map(Into::into))
    }
}

#[async_trait]
impl JobsRepository for OrmJobsRepository {
    async fn create<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        new_job: &NewJob,
    ) -> Result<Job, DomainError> {
        let saved = job::ActiveModel {
            user_id: Set(new_job.user_id),
            title: Set(new_job.title.clone()),
            // SQLite compares the stored text, so every instant is kept in UTC.
            created_at: Set(new_job
                .created_at
                .map_or_else(OffsetDateTime::now_utc, |at| at.to_offset(UtcOffset::UTC))),
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
    ) -> Result<Option<Job>, DomainError> {
        let found = job::Entity::find_by_id(id)
            .one(conn)
            .await
            .map_err(db_err)?;
        Ok(found.map(Into::into))
    }

    async fn for_user<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i64,
    ) -> Result<Vec<Job>, DomainError> {
        let rows = job::Entity::find()
            .filter(job::Column::UserId.eq(user_id))
            .order_by_asc(job::Column::Id)
            .all(conn)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn delete<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<bool, DomainError> {
        let result = job::Entity::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn latest_for_user<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i64,
        key: OfManyKey,
    ) -> Result<Option<Job>, DomainError> {
        Self::one_of_many(conn, user_id, key, Order::Desc).await
    }

    async fn oldest_for_user<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i64,
        key: OfManyKey,
    ) -> Result<Option<Job>, DomainError> {
        Self::one_of_many(conn, user_id, key, Order::Asc).await
    }
}
