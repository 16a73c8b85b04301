use async_trait::async_trait;
use blog_db::DbConnTrait;
use blog_sdk::{
    Company, Contact, Job, NewCompany, NewContact, NewJob, NewPhoneNumber, OfManyKey,
    PhoneNumber, User, UserPatch,
};

use crate::domain::error::DomainError;

/// A user as stored: the password is already hashed.
#[derive(Clone)]
pub struct UserRecord {
    pub country_id: Option<i64>,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub balance: i64,
}

/// Repository trait for User persistence and the user's direct relations.
#[async_trait]
pub trait UsersRepository: Send + Sync {
    async fn create<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        record: UserRecord,
    ) -> Result<User, DomainError>;

    async fn get<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<Option<User>, DomainError>;

    async fn find_by_email<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        email: &str,
    ) -> Result<Option<User>, DomainError>;

    async fn list<C: DbConnTrait + Send + Sync>(&self, conn: &C)
    -> Result<Vec<User>, DomainError>;

    async fn count<C: DbConnTrait + Send + Sync>(&self, conn: &C) -> Result<u64, DomainError>;

    /// Ids of all users in ascending order.
    async fn ids<C: DbConnTrait + Send + Sync>(&self, conn: &C) -> Result<Vec<i64>, DomainError>;

    async fn update<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
        patch: &UserPatch,
    ) -> Result<User, DomainError>;

    /// Physically removes the user; contacts, companies, jobs and posts go
    /// with it through foreign-key cascades.
    async fn delete<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<bool, DomainError>;

    async fn password_hash<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<Option<String>, DomainError>;

    async fn contact<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i64,
    ) -> Result<Option<Contact>, DomainError>;

    /// Create or replace the user's single contact row.
    async fn put_contact<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i64,
        contact: &NewContact,
    ) -> Result<Contact, DomainError>;

    async fn companies<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i64,
    ) -> Result<Vec<Company>, DomainError>;

    /// First phone number (by id) across all of the user's companies.
    async fn company_phone_number<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i64,
    ) -> Result<Option<PhoneNumber>, DomainError>;
}

#[async_trait]
pub trait CompaniesRepository: Send + Sync {
    async fn create<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        new_company: &NewCompany,
    ) -> Result<Company, DomainError>;

    async fn get<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<Option<Company>, DomainError>;

    async fn rename<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
        name: &str,
    ) -> Result<Company, DomainError>;

    async fn delete<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<bool, DomainError>;

    async fn add_phone_number<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        new_number: &NewPhoneNumber,
    ) -> Result<PhoneNumber, DomainError>;

    /// The company's phone number; the lowest id wins when several exist.
    async fn phone_number<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        company_id: i64,
    ) -> Result<Option<PhoneNumber>, DomainError>;
}

#[async_trait]
pub trait JobsRepository: Send + Sync {
    async fn create<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        new_job: &NewJob,
    ) -> Result<Job, DomainError>;

    async fn get<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<Option<Job>, DomainError>;

    async fn for_user<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i64,
    ) -> Result<Vec<Job>, DomainError>;

    async fn delete<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<bool, DomainError>;

    /// The job with the greatest `key`.
    async fn latest_for_user<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i64,
        key: OfManyKey,
    ) -> Result<Option<Job>, DomainError>;

    /// The job with the smallest `key`.
    async fn oldest_for_user<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i64,
        key: OfManyKey,
    ) -> Result<Option<Job>, DomainError>;
}
