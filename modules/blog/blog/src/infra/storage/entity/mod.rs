pub mod comment;
pub mod company;
pub mod contact;
pub mod country;
pub mod image;
pub mod job;
pub mod morph_kind;
pub mod phone_number;
pub mod post;
pub mod post_tag;
pub mod tag;
pub mod taggable;
pub mod user;
pub mod video;

pub use morph_kind::MorphKind;
