//! Blog SDK
//!
//! Public contract of the `blog` module:
//! - Model types for countries, users, posts, tags, media and their relations
//! - Typed polymorphic owners (`ImageOwner`, `Commentable`, `TaggableRef`)
//! - Error type (`BlogError`)

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod errors;
pub mod models;
pub mod morph;

pub use errors::BlogError;
pub use models::{
    Comment, CommentableEntity, Company, Contact, Country, CountryPatch, Image, ImageOwnerEntity,
    Job, NewComment, NewCompany, NewContact, NewCountry, NewImage, NewJob, NewPhoneNumber, NewPost,
    NewTag, NewUser, NewVideo, OfManyKey, PhoneNumber, Post, PostPatch, SyncChanges, Tag, TagPatch,
    Trashed, User, UserPatch, Video, VideoPatch,
};
pub use morph::{Commentable, ImageOwner, MorphType, TaggableRef};
