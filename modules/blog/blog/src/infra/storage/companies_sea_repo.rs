use async_trait::async_trait;
use blog_db::DbConnTrait;
use blog_sdk::{Company, NewCompany, NewPhoneNumber, PhoneNumber};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::domain::error::DomainError;
use crate::domain::repos::CompaniesRepository;
use crate::infra::storage::db::db_err;
use crate::infra::storage::entity::{company, phone_number};

#[derive(Clone, Default)]
pub struct OrmCompaniesRepository;

#[async_trait]
impl CompaniesRepository for OrmCompaniesRepository {
    async fn create<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        new_company: &NewCompany,
    ) -> Result<Company, DomainError> {
        let saved = company::ActiveModel {
            user_id: Set(new_company.user_id),
            name: Set(new_company.name.clone()),
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
    ) -> Result<Option<Company>, DomainError> {
        let found = company::Entity::find_by_id(id)
            .one(conn)
            .await
            .map_err(db_err)?;
        Ok(found.map(Into::into))
    }

    async fn rename<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
        name: &str,
    ) -> Result<Company, DomainError> {
        let existing = company::Entity::find_by_id(id)
            .one(conn)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("Company", id))?;

        let mut m: company::ActiveModel = existing.into();
        m.name = Set(name.to_owned());
        let updated = m.update(conn).await.map_err(db_err)?;
        Ok(updated.into())
    }

    async fn delete<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<bool, DomainError> {
        let result = company::Entity::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn add_phone_number<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        new_number: &NewPhoneNumber,
    ) -> Result<PhoneNumber, DomainError> {
        let saved = phone_number::ActiveModel {
            company_id: Set(new_number.company_id),
            number: Set(new_number.number.clone()),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(db_err)?;
        Ok(saved.into())
    }

    async fn phone_number<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        company_id: i64,
    ) -> Result<Option<PhoneNumber>, DomainError> {
        let found = phone_number::Entity::find()
            .filter(phone_number::Column::CompanyId.eq(company_id))
            .order_by_asc(phone_number::Column::Id)
            .one(conn)
            .await
            .map_err(db_err)?;
        Ok(found.map(Into::into))
    }
}
