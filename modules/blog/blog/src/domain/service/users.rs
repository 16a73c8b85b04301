use blog_sdk::{
    Company, Contact, ImageOwner, Job, NewCompany, NewContact, NewJob, NewPhoneNumber, NewUser,
    OfManyKey, PhoneNumber, Post, Trashed, User, UserPatch,
};
use sea_orm::TransactionTrait;
use tracing::{debug, info, instrument};

use super::{BlogService, on_conflict, validate_email};
use crate::domain::error::DomainError;
use crate::domain::repos::{
    CompaniesRepository, ImagesRepository, JobsRepository, PostsRepository, Repos, UserRecord,
    UsersRepository,
};
use crate::infra::storage::db::db_err;

impl<R: Repos> BlogService<R> {
    #[instrument(skip(self, new_user), fields(email = %new_user.email))]
    pub async fn create_user(&self, new_user: NewUser) -> Result<User, DomainError> {
        info!("Creating new user");

        self.validate_name("name", &new_user.name)?;
        let email = new_user.email.trim().to_owned();
        validate_email(&email)?;
        if new_user.password.chars().count() < self.config.password_min_length {
            return Err(DomainError::validation(
                "password",
                format!(
                    "must be at least {} characters",
                    self.config.password_min_length
                ),
            ));
        }

        let users = self.repos.users();
        if users.find_by_email(&self.db, &email).await?.is_some() {
            return Err(DomainError::email_already_exists(email));
        }

        let record = UserRecord {
            country_id: new_user.country_id,
            name: new_user.name.trim().to_owned(),
            email: email.clone(),
            password_hash: self.hasher.hash(&new_user.password)?,
            balance: new_user.balance,
        };

        let user = users
            .create(&self.db, record)
            .await
            .map_err(|e| on_conflict(e, || DomainError::email_already_exists(email)))?;

        info!(user_id = user.id, "Successfully created user");
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, id: i64) -> Result<User, DomainError> {
        debug!("Getting user by id");
        self.repos
            .users()
            .get(&self.db, id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.repos.users().find_by_email(&self.db, email.trim()).await
    }

    pub async fn list_users(&self) -> Result<Vec<User>, DomainError> {
        self.repos.users().list(&self.db).await
    }

    pub async fn count_users(&self) -> Result<u64, DomainError> {
        self.repos.users().count(&self.db).await
    }

    pub async fn user_ids(&self) -> Result<Vec<i64>, DomainError> {
        self.repos.users().ids(&self.db).await
    }

    #[instrument(skip(self, patch))]
    pub async fn update_user(&self, id: i64, mut patch: UserPatch) -> Result<User, DomainError> {
        info!("Updating user");

        if let Some(name) = patch.name.take() {
            self.validate_name("name", &name)?;
            patch.name = Some(name.trim().to_owned());
        }
        if let Some(email) = patch.email.take() {
            let email = email.trim().to_owned();
            validate_email(&email)?;
            if let Some(other) = self.repos.users().find_by_email(&self.db, &email).await?
                && other.id != id
            {
                return Err(DomainError::email_already_exists(email));
            }
            patch.email = Some(email);
        }

        let email = patch.email.clone().unwrap_or_default();
        self.repos
            .users()
            .update(&self.db, id, &patch)
            .await
            .map_err(|e| on_conflict(e, || DomainError::email_already_exists(email)))
    }

    /// Delete a user and everything that hangs off it.
    ///
    /// Foreign keys take the contact, companies, phone numbers, jobs, posts and
    /// their `post_tag` rows. The user's images and the images, comments and
    /// tag assignments of every post (trashed ones included) are removed here.
    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: i64) -> Result<(), DomainError> {
        info!("Deleting user");

        let txn = self.db.begin().await.map_err(db_err)?;

        if self.repos.users().get(&txn, id).await?.is_none() {
            return Err(DomainError::not_found("User", id));
        }

        let posts = self
            .repos
            .posts()
            .list_by_user(&txn, id, Trashed::Include)
            .await?;
        for post in &posts {
            self.purge_post_children(&txn, post.id).await?;
        }
        self.repos
            .images()
            .delete_for(&txn, ImageOwner::User(id))
            .await?;
        self.repos.users().delete(&txn, id).await?;

        txn.commit().await.map_err(db_err)?;

        info!(posts = posts.len(), "Successfully deleted user");
        Ok(())
    }

    /// `Ok(false)` for a wrong password; `NotFound` for an unknown user.
    #[instrument(skip(self, password))]
    pub async fn verify_password(&self, user_id: i64, password: &str) -> Result<bool, DomainError> {
        let hash = self
            .repos
            .users()
            .password_hash(&self.db, user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", user_id))?;
        self.hasher.verify(password, &hash)
    }

    pub async fn user_contact(&self, user_id: i64) -> Result<Option<Contact>, DomainError> {
        self.repos.users().contact(&self.db, user_id).await
    }

    #[instrument(skip(self, contact))]
    pub async fn put_contact(
        &self,
        user_id: i64,
        contact: NewContact,
    ) -> Result<Contact, DomainError> {
        if contact.phone.trim().is_empty() {
            return Err(DomainError::validation("phone", "must not be empty"));
        }
        self.get_user(user_id).await?;
        self.repos
            .users()
            .put_contact(&self.db, user_id, &contact)
            .await
    }

    pub async fn user_posts(&self, user_id: i64, trashed: Trashed) -> Result<Vec<Post>, DomainError> {
        self.repos
            .posts()
            .list_by_user(&self.db, user_id, trashed)
            .await
    }

    pub async fn user_companies(&self, user_id: i64) -> Result<Vec<Company>, DomainError> {
        self.repos.users().companies(&self.db, user_id).await
    }

    #[instrument(skip(self, new_company), fields(user_id = new_company.user_id))]
    pub async fn create_company(&self, new_company: NewCompany) -> Result<Company, DomainError> {
        self.validate_name("name", &new_company.name)?;
        self.get_user(new_company.user_id).await?;
        self.repos.companies().create(&self.db, &new_company).await
    }

    pub async fn get_company(&self, id: i64) -> Result<Company, DomainError> {
        self.repos
            .companies()
            .get(&self.db, id)
            .await?
            .ok_or_else(|| DomainError::not_found("Company", id))
    }

    pub async fn rename_company(&self, id: i64, name: &str) -> Result<Company, DomainError> {
        self.validate_name("name", name)?;
        self.repos
            .companies()
            .rename(&self.db, id, name.trim())
            .await
    }

    pub async fn delete_company(&self, id: i64) -> Result<(), DomainError> {
        if self.repos.companies().delete(&self.db, id).await? {
            Ok(())
        } else {
            Err(DomainError::not_found("Company", id))
        }
    }

    #[instrument(skip(self, new_number), fields(company_id = new_number.company_id))]
    pub async fn add_phone_number(
        &self,
        new_number: NewPhoneNumber,
    ) -> Result<PhoneNumber, DomainError> {
        if new_number.number.trim().is_empty() {
            return Err(DomainError::validation("number", "must not be empty"));
        }
        self.get_company(new_number.company_id).await?;
        self.repos
            .companies()
            .add_phone_number(&self.db, &new_number)
            .await
    }

    pub async fn company_phone(&self, company_id: i64) -> Result<Option<PhoneNumber>, DomainError> {
        self.repos.companies().phone_number(&self.db, company_id).await
    }

    /// The user's phone number reached through their companies.
    pub async fn user_phone_number(&self, user_id: i64) -> Result<Option<PhoneNumber>, DomainError> {
        self.repos
            .users()
            .company_phone_number(&self.db, user_id)
            .await
    }

    #[instrument(skip(self, new_job), fields(user_id = new_job.user_id))]
    pub async fn create_job(&self, new_job: NewJob) -> Result<Job, DomainError> {
        self.validate_name("title", &new_job.title)?;
        self.get_user(new_job.user_id).await?;
        self.repos.jobs().create(&self.db, &new_job).await
    }

    pub async fn user_jobs(&self, user_id: i64) -> Result<Vec<Job>, DomainError> {
        self.repos.jobs().for_user(&self.db, user_id).await
    }

    pub async fn delete_job(&self, id: i64) -> Result<(), DomainError> {
        if self.repos.jobs().delete(&self.db, id).await? {
            Ok(())
        } else {
            Err(DomainError::not_found("Job", id))
        }
    }

    pub async fn latest_job(&self, user_id: i64, key: OfManyKey) -> Result<Option<Job>, DomainError> {
        self.repos
            .jobs()
            .latest_for_user(&self.db, user_id, key)
            .await
    }

    pub async fn oldest_job(&self, user_id: i64, key: OfManyKey) -> Result<Option<Job>, DomainError> {
        self.repos
            .jobs()
            .oldest_for_user(&self.db, user_id, key)
            .await
    }
}
