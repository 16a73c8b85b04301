//! Public models for the `blog` module.
//!
//! Transport-agnostic data structures shared between the module and its
//! consumers. Identifiers are the database's auto-increment keys.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::morph::{Commentable, ImageOwner};

/// Which soft-deleted rows a post query should see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trashed {
    /// Only live rows. This is what every default listing uses.
    #[default]
    Exclude,
    /// Live and soft-deleted rows.
    Include,
    /// Only soft-deleted rows.
    Only,
}

/// Ordering key for has-one-of-many lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfManyKey {
    #[default]
    Id,
    /// `created_at`, ties broken by `id` in the same direction.
    CreatedAt,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub id: i64,
    pub name: String,
    pub code: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCountry {
    pub name: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct CountryPatch {
    pub name: Option<String>,
    pub code: Option<String>,
}

/// A user. The password hash and remember token never leave storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub country_id: Option<i64>,
    pub name: String,
    pub email: String,
    /// Account balance in minor currency units.
    pub balance: i64,
    #[serde(with = "time::serde::rfc3339::option")]
    pub email_verified_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Data for creating a new user. `password` is plain text and is hashed
/// before it reaches storage.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct NewUser {
    pub country_id: Option<i64>,
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub balance: i64,
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("country_id", &self.country_id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("balance", &self.balance)
            .finish()
    }
}

/// Partial update data for a user.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub balance: Option<i64>,
    /// `Some(None)` detaches the user from its country.
    pub country_id: Option<Option<i64>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub user_id: i64,
    pub phone: String,
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewContact {
    pub phone: String,
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewCompany {
    pub user_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneNumber {
    pub id: i64,
    pub company_id: i64,
    pub number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewPhoneNumber {
    pub company_id: i64,
    pub number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewJob {
    pub user_id: i64,
    pub title: String,
    /// Defaults to now.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub description: String,
    pub is_published: bool,
    pub min_to_read: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub deleted_at: Option<OffsetDateTime>,
}

impl Post {
    #[must_use]
    pub fn is_trashed(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Data for creating a post. An absent `slug` is derived from the title.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewPost {
    pub user_id: i64,
    pub title: String,
    pub slug: Option<String>,
    pub excerpt: String,
    pub description: String,
    pub is_published: bool,
    pub min_to_read: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct PostPatch {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub description: Option<String>,
    pub is_published: Option<bool>,
    pub min_to_read: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

/// Data for creating a tag. An absent `slug` is derived from the name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewTag {
    pub name: String,
    pub slug: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct TagPatch {
    pub name: Option<String>,
    pub slug: Option<String>,
}

/// Outcome of replacing a post's tag set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SyncChanges {
    pub attached: Vec<i64>,
    pub detached: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub id: i64,
    pub url: String,
    pub owner: ImageOwner,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewImage {
    pub url: String,
    pub owner: ImageOwner,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub description: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewVideo {
    pub title: String,
    pub url: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct VideoPatch {
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub body: String,
    pub commentable: Commentable,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewComment {
    pub body: String,
    pub commentable: Commentable,
}

/// The entity an image belongs to, loaded through its `(type, id)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "entity", rename_all = "snake_case")]
pub enum ImageOwnerEntity {
    User(User),
    Post(Post),
}

/// The entity a comment belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "entity", rename_all = "snake_case")]
pub enum CommentableEntity {
    Post(Post),
    Video(Video),
}
