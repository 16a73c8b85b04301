use async_trait::async_trait;
use blog_db::DbConnTrait;
use blog_sdk::{Country, CountryPatch, NewCountry, Post, Trashed, User};

use crate::domain::error::DomainError;

#[async_trait]
pub trait CountriesRepository: Send + Sync {
    async fn create<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        new_country: &NewCountry,
    ) -> Result<Country, DomainError>;

    async fn get<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<Option<Country>, DomainError>;

    /// All countries ordered by id.
    async fn list<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
    ) -> Result<Vec<Country>, DomainError>;

    async fn update<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
        patch: &CountryPatch,
    ) -> Result<Country, DomainError>;

    /// Users of a deleted country keep existing with `country_id = NULL`.
    async fn delete<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<bool, DomainError>;

    async fn users<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        country_id: i64,
    ) -> Result<Vec<User>, DomainError>;

    /// Posts written by the country's users, joined through `users`.
    async fn posts<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        country_id: i64,
        trashed: Trashed,
    ) -> Result<Vec<Post>, DomainError>;
}
