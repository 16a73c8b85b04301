use blog_sdk::{Country, CountryPatch, NewCountry, Post, Trashed, User};
use tracing::{info, instrument};

use super::{BlogService, on_conflict};
use crate::domain::error::DomainError;
use crate::domain::repos::{CountriesRepository, Repos};

fn normalize_code(code: &str) -> Result<String, DomainError> {
    let code = code.trim().to_ascii_uppercase();
    if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(DomainError::validation("code", "must be ASCII letters"));
    }
    Ok(code)
}

impl<R: Repos> BlogService<R> {
    #[instrument(skip(self, new_country), fields(code = %new_country.code))]
    pub async fn create_country(&self, new_country: NewCountry) -> Result<Country, DomainError> {
        info!("Creating country");
        self.validate_name("name", &new_country.name)?;
        let code = normalize_code(&new_country.code)?;

        let new_country = NewCountry {
            name: new_country.name.trim().to_owned(),
            code: code.clone(),
        };
        self.repos
            .countries()
            .create(&self.db, &new_country)
            .await
            .map_err(|e| {
                on_conflict(e, || {
                    DomainError::conflict(format!("country code '{code}' already exists"))
                })
            })
    }

    pub async fn get_country(&self, id: i64) -> Result<Country, DomainError> {
        self.repos
            .countries()
            .get(&self.db, id)
            .await?
            .ok_or_else(|| DomainError::not_found("Country", id))
    }

    pub async fn list_countries(&self) -> Result<Vec<Country>, DomainError> {
        self.repos.countries().list(&self.db).await
    }

    pub async fn update_country(
        &self,
        id: i64,
        mut patch: CountryPatch,
    ) -> Result<Country, DomainError> {
        if let Some(name) = &patch.name {
            self.validate_name("name", name)?;
        }
        if let Some(code) = patch.code.take() {
            patch.code = Some(normalize_code(&code)?);
        }
        self.repos.countries().update(&self.db, id, &patch).await
    }

    /// Users of the country survive with their country cleared.
    #[instrument(skip(self))]
    pub async fn delete_country(&self, id: i64) -> Result<(), DomainError> {
        info!("Deleting country");
        if self.repos.countries().delete(&self.db, id).await? {
            Ok(())
        } else {
            Err(DomainError::not_found("Country", id))
        }
    }

    pub async fn country_users(&self, country_id: i64) -> Result<Vec<User>, DomainError> {
        self.repos.countries().users(&self.db, country_id).await
    }

    /// Posts of every user in the country, in post id order.
    pub async fn country_posts(
        &self,
        country_id: i64,
        trashed: Trashed,
    ) -> Result<Vec<Post>, DomainError> {
        self.repos
            .countries()
            .posts(&self.db, country_id, trashed)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::normalize_code;

    #[test]
    fn test_codes_are_uppercased() {
        assert_eq!(normalize_code(" de ").ok().as_deref(), Some("DE"));
        assert!(normalize_code("d3").is_err());
        assert!(normalize_code("").is_err());
    }
}
