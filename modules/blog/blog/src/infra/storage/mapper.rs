//! Conversions between sea-orm models and SDK contract types.

use blog_sdk::{
    Comment, Commentable, Company, Contact, Country, Image, ImageOwner, Job, MorphType,
    PhoneNumber, Post, Tag, TaggableRef, User, Video,
};

use crate::domain::error::DomainError;
use crate::infra::storage::entity::{
    MorphKind, comment, company, contact, country, image, job, phone_number, post, tag, taggable,
    user, video,
};

impl From<MorphKind> for MorphType {
    fn from(kind: MorphKind) -> Self {
        match kind {
            MorphKind::User => Self::User,
            MorphKind::Post => Self::Post,
            MorphKind::Video => Self::Video,
        }
    }
}

impl From<MorphType> for MorphKind {
    fn from(kind: MorphType) -> Self {
        match kind {
            MorphType::User => Self::User,
            MorphType::Post => Self::Post,
            MorphType::Video => Self::Video,
        }
    }
}

/// Split any owner variant into the stored column pair.
pub fn morph_parts(owner: impl Into<(MorphType, i64)>) -> (MorphKind, i64) {
    let (kind, id) = owner.into();
    (kind.into(), id)
}

/// A stored owner kind outside the relation's variant set means the row was
/// written by something other than these repositories.
fn corrupt_owner(table: &str, id: i64, err: &blog_sdk::BlogError) -> DomainError {
    DomainError::database(format!("{table} row {id} has an invalid owner: {err}"))
}

impl From<country::Model> for Country {
    fn from(m: country::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            code: m.code,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// The password hash and remember token stay behind.
impl From<user::Model> for User {
    fn from(m: user::Model) -> Self {
        Self {
            id: m.id,
            country_id: m.country_id,
            name: m.name,
            email: m.email,
            balance: m.balance,
            email_verified_at: m.email_verified_at,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

impl From<contact::Model> for Contact {
    fn from(m: contact::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            phone: m.phone,
            address: m.address,
        }
    }
}

impl From<company::Model> for Company {
    fn from(m: company::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            name: m.name,
        }
    }
}

impl From<phone_number::Model> for PhoneNumber {
    fn from(m: phone_number::Model) -> Self {
        Self {
            id: m.id,
            company_id: m.company_id,
            number: m.number,
        }
    }
}

impl From<job::Model> for Job {
    fn from(m: job::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            title: m.title,
            created_at: m.created_at,
        }
    }
}

impl From<post::Model> for Post {
    fn from(m: post::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            title: m.title,
            slug: m.slug,
            excerpt: m.excerpt,
            description: m.description,
            is_published: m.is_published,
            min_to_read: m.min_to_read,
            created_at: m.created_at,
            updated_at: m.updated_at,
            deleted_at: m.deleted_at,
        }
    }
}

impl From<tag::Model> for Tag {
    fn from(m: tag::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            slug: m.slug,
        }
    }
}

impl From<video::Model> for Video {
    fn from(m: video::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            url: m.url,
            description: m.description,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

impl TryFrom<image::Model> for Image {
    type Error = DomainError;

    fn try_from(m: image::Model) -> Result<Self, Self::Error> {
        let owner = ImageOwner::from_parts(m.imageable_type.into(), m.imageable_id)
            .map_err(|e| corrupt_owner("images", m.id, &e))?;
        Ok(Self {
            id: m.id,
            url: m.url,
            owner,
        })
    }
}

impl TryFrom<comment::Model> for Comment {
    type Error = DomainError;

    fn try_from(m: comment::Model) -> Result<Self, Self::Error> {
        let commentable = Commentable::from_parts(m.commentable_type.into(), m.commentable_id)
            .map_err(|e| corrupt_owner("comments", m.id, &e))?;
        Ok(Self {
            id: m.id,
            body: m.body,
            commentable,
            created_at: m.created_at,
        })
    }
}

impl TryFrom<taggable::Model> for TaggableRef {
    type Error = DomainError;

    fn try_from(m: taggable::Model) -> Result<Self, Self::Error> {
        Self::from_parts(m.taggable_type.into(), m.taggable_id)
            .map_err(|e| corrupt_owner("taggables", m.tag_id, &e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_morph_kind_maps_both_ways() {
        for kind in [MorphType::User, MorphType::Post, MorphType::Video] {
            assert_eq!(MorphType::from(MorphKind::from(kind)), kind);
        }
        assert_eq!(
            morph_parts(ImageOwner::Post(4)),
            (MorphKind::Post, 4)
        );
    }

    #[test]
    fn test_image_rejects_foreign_owner_kind() {
        let m = image::Model {
            id: 1,
            url: "https://img.example/1.png".to_owned(),
            imageable_type: MorphKind::Video,
            imageable_id: 9,
        };
        assert!(matches!(
            Image::try_from(m),
            Err(DomainError::Database { .. })
        ));
    }

    #[test]
    fn test_comment_keeps_commentable_pair() {
        let m = comment::Model {
            id: 3,
            body: "nice".to_owned(),
            commentable_type: MorphKind::Video,
            commentable_id: 2,
            created_at: time::OffsetDateTime::UNIX_EPOCH,
        };
        let comment = Comment::try_from(m).unwrap_or_else(|e| panic!("valid row: {e}"));
        assert_eq!(comment.commentable, Commentable::Video(2));
    }
}
