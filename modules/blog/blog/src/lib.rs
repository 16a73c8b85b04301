//! Blog Module
//!
//! Typed repositories over a relational blog schema: countries, users and
//! their contacts, companies and jobs, posts with soft delete, tags through
//! a pivot table, and polymorphic images, comments and tag assignments.
//!
//! ## Public API
//!
//! Models and errors live in `blog-sdk` and are re-exported here.
//! Start the module with [`Blog::start`] and use [`Blog::service`].
#![forbid(unsafe_code)]

// === PUBLIC API (from SDK) ===
pub use blog_sdk::{
    BlogError, Comment, Commentable, CommentableEntity, Company, Contact, Country, CountryPatch,
    Image, ImageOwner, ImageOwnerEntity, Job, MorphType, NewComment, NewCompany, NewContact,
    NewCountry, NewImage, NewJob, NewPhoneNumber, NewPost, NewTag, NewUser, NewVideo, OfManyKey,
    PhoneNumber, Post, PostPatch, SyncChanges, Tag, TagPatch, TaggableRef, Trashed, User,
    UserPatch, Video, VideoPatch,
};

// === MODULE DEFINITION ===
pub mod module;
pub use module::{Blog, ConcreteBlogService};

pub mod config;
pub use config::BlogConfig;

// === INTERNAL MODULES ===
// Exposed for integration tests and the CLI; prefer the SDK types.
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
