use async_trait::async_trait;
use blog_db::DbConnTrait;
use blog_sdk::{Country, CountryPatch, NewCountry, Post, Trashed, User};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use time::OffsetDateTime;

use crate::domain::error::DomainError;
use crate::domain::repos::CountriesRepository;
use crate::infra::storage::db::db_err;
use crate::infra::storage::entity::{country, post, user};
use crate::infra::storage::posts_sea_repo::scope_trashed;

#[derive(Clone, Default)]
pub struct OrmCountriesRepository;

#[async_trait]
impl CountriesRepository for OrmCountriesRepository {
    async fn create<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        new_country: &NewCountry,
    ) -> Result<Country, DomainError> {
        let now = OffsetDateTime::now_utc();
        let saved = country::ActiveModel {
            name: Set(new_country.name.clone()),
            code: Set(new_country.code.clone()),
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
    ) -> Result<Option<Country>, DomainError> {
        let found = country::Entity::find_by_id(id)
            .one(conn)
            .await
            .map_err(db_err)?;
        Ok(found.map(Into::into))
    }

    async fn list<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
    ) -> Result<Vec<Country>, DomainError> {
        let rows = country::Entity::find()
            .order_by_asc(country::Column::Id)
            .all(conn)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
        patch: &CountryPatch,
    ) -> Result<Country, DomainError> {
        let existing = country::Entity::find_by_id(id)
            .one(conn)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("Country", id))?;

        let mut m: country::ActiveModel = existing.into();
        if let Some(name) = &patch.name {
            m.name = Set(name.clone());
        }
        if let Some(code) = &patch.code {
            m.code = Set(code.clone());
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
        let result = country::Entity::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn users<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        country_id: i64,
    ) -> Result<Vec<User>, DomainError> {
        let rows = user::Entity::find()
            .filter(user::Column::CountryId.eq(country_id))
            .order_by_asc(user::Column::Id)
            .all(conn)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn posts<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        country_id: i64,
        trashed: Trashed,
    ) -> Result<Vec<Post>, DomainError> {
        let query = post::Entity::find()
            .inner_join(user::Entity)
            .filter(user::Column::CountryId.eq(country_id));
        let rows = scope_trashed(query, trashed)
            .order_by_asc(post::Column::Id)
            .all(conn)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
