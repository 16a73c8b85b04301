use async_trait::async_trait;
use blog_db::DbConnTrait;
use blog_sdk::{Company, Contact, NewContact, PhoneNumber, User, UserPatch};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use time::OffsetDateTime;

use crate::domain::error::DomainError;
use crate::domain::repos::{UserRecord, UsersRepository};
use crate::infra::storage::db::db_err;
use crate::infra::storage::entity::{company, contact, phone_number, user};

/// ORM-based implementation of the `UsersRepository` trait.
#[derive(Clone, Default)]
pub struct OrmUsersRepository;

#[async_trait]
impl UsersRepository for OrmUsersRepository {
    async fn create<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        record: UserRecord,
    ) -> Result<User, DomainError> {
        let now = OffsetDateTime::now_utc();
        let m = user::ActiveModel {
            country_id: Set(record.country_id),
            name: Set(record.name),
            email: Set(record.email),
            password: Set(record.password_hash),
            remember_token: Set(None),
            email_verified_at: Set(None),
            balance: Set(record.balance),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let saved = m.insert(conn).await.map_err(db_err)?;
        Ok(saved.into())
    }

    async fn get<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<Option<User>, DomainError> {
        let found = user::Entity::find_by_id(id)
            .one(conn)
            .await
            .map_err(db_err)?;
        Ok(found.map(Into::into))
    }

    async fn find_by_email<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        email: &str,
    ) -> Result<Option<User>, DomainError> {
        let found = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(conn)
            .await
            .map_err(db_err)?;
        Ok(found.map(Into::into))
    }

    async fn list<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
    ) -> Result<Vec<User>, DomainError> {
        let rows = user::Entity::find()
            .order_by_asc(user::Column::Id)
            .all(conn)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count<C: DbConnTrait + Send + Sync>(&self, conn: &C) -> Result<u64, DomainError> {
        user::Entity::find().count(conn).await.map_err(db_err)
    }

    async fn ids<C: DbConnTrait + Send + Sync>(&self, conn: &C) -> Result<Vec<i64>, DomainError> {
        user::Entity::find()
            .select_only()
            .column(user::Column::Id)
            .order_by_asc(user::Column::Id)
            .into_tuple::<i64>()
            .all(conn)
            .await
            .map_err(db_err)
    }

    async fn update<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
        patch: &UserPatch,
    ) -> Result<User, DomainError> {
        let existing = user::Entity::find_by_id(id)
            .one(conn)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("User", id))?;

        let mut m: user::ActiveModel = existing.into();
        if let Some(name) = &patch.name {
            m.name = Set(name.clone());
        }
        if let Some(email) = &patch.email {
            m.email = Set(email.clone());
        }
        if let Some(balance) = patch.balance {
            m.balance = Set(balance);
        }
        if let Some(country_id) = patch.country_id {
            m.country_id = Set(country_id);
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
        let result = user::Entity::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn password_hash<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<Option<String>, DomainError> {
        user::Entity::find_by_id(id)
            .select_only()
            .column(user::Column::Password)
            .into_tuple::<String>()
            .one(conn)
            .await
            .map_err(db_err)
    }

    async fn contact<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i64,
    ) -> Result<Option<Contact>, DomainError> {
        let found = contact::Entity::find()
            .filter(contact::Column::UserId.eq(user_id))
            .one(conn)
            .await
            .map_err(db_err)?;
        Ok(found.map(Into::into))
    }

    async fn put_contact<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i64,
        new_contact: &NewContact,
    ) -> Result<Contact, DomainError> {
        let existing = contact::Entity::find()
            .filter(contact::Column::UserId.eq(user_id))
            .one(conn)
            .await
            .map_err(db_err)?;

        let saved = if let Some(existing) = existing {
            let mut m: contact::ActiveModel = existing.into();
            m.phone = Set(new_contact.phone.clone());
            m.address = Set(new_contact.address.clone());
            m.update(conn).await.map_err(db_err)?
        } else {
            contact::ActiveModel {
                user_id: Set(user_id),
                phone: Set(new_contact.phone.clone()),
                address: Set(new_contact.address.clone()),
                ..Default::default()
            }
            .insert(conn)
            .await
            .map_err(db_err)?
        };
        Ok(saved.into())
    }

    async fn companies<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i64,
    ) -> Result<Vec<Company>, DomainError> {
        let rows = company::Entity::find()
            .filter(company::Column::UserId.eq(user_id))
            .order_by_asc(company::Column::Id)
            .all(conn)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn company_phone_number<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i64,
    ) -> Result<Option<PhoneNumber>, DomainError> {
        let found = phone_number::Entity::find()
            .inner_join(company::Entity)
            .filter(company::Column::UserId.eq(user_id))
            .order_by_asc(phone_number::Column::Id)
            .one(conn)
            .await
            .map_err(db_err)?;
        Ok(found.map(Into::into))
    }
}
