//! Polymorphic owners.
//!
//! A polymorphic child row stores an `(owner_type, owner_id)` pair instead of
//! a single foreign key. On the Rust side each relation gets its own tagged
//! variant listing only the owner kinds it accepts, so an `Image` can never be
//! attached to a `Video` and a `Comment` never to a `User`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::BlogError;

/// Morph-map name of every entity that can own polymorphic children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MorphType {
    User,
    Post,
    Video,
}

impl MorphType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Post => "post",
            Self::Video => "video",
        }
    }
}

impl fmt::Display for MorphType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MorphType {
    type Err = BlogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "post" => Ok(Self::Post),
            "video" => Ok(Self::Video),
            other => Err(BlogError::validation(format!("unknown morph type '{other}'"))),
        }
    }
}

macro_rules! morph_owner {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(tag = "type", content = "id", rename_all = "snake_case")]
        pub enum $name {
            $($variant(i64),)+
        }

        impl $name {
            #[must_use]
            pub const fn morph_type(self) -> MorphType {
                match self {
                    $(Self::$variant(_) => MorphType::$variant,)+
                }
            }

            #[must_use]
            pub const fn id(self) -> i64 {
                match self {
                    $(Self::$variant(id) => id,)+
                }
            }

            /// Rebuild from a stored pair, rejecting kinds this relation does not accept.
            ///
            /// # Errors
            /// Returns `BlogError::Validation` for an owner kind outside this relation.
            pub fn from_parts(kind: MorphType, id: i64) -> Result<Self, BlogError> {
                match kind {
                    $(MorphType::$variant => Ok(Self::$variant(id)),)+
                    #[allow(unreachable_patterns)]
                    other => Err(BlogError::validation(format!(
                        "{} cannot be owned by '{other}'",
                        stringify!($name)
                    ))),
                }
            }
        }

        impl From<$name> for (MorphType, i64) {
            fn from(owner: $name) -> Self {
                (owner.morph_type(), owner.id())
            }
        }
    };
}

morph_owner! {
    /// Owner of an `Image`: exactly one User or Post.
    ImageOwner { User, Post }
}

morph_owner! {
    /// Owner of a `Comment`.
    Commentable { Post, Video }
}

morph_owner! {
    /// Target of a polymorphic tag assignment.
    TaggableRef { Post, Video }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_morph_type_round_trips_through_str() {
        for kind in [MorphType::User, MorphType::Post, MorphType::Video] {
            assert_eq!(kind.as_str().parse::<MorphType>().ok(), Some(kind));
        }
        assert!("App\\Models\\User".parse::<MorphType>().is_err());
    }

    #[test]
    fn test_owner_parts_match_variant() {
        let owner = ImageOwner::User(5);
        assert_eq!(owner.morph_type(), MorphType::User);
        assert_eq!(owner.id(), 5);
        assert_eq!(<(MorphType, i64)>::from(owner), (MorphType::User, 5));
    }

    #[test]
    fn test_from_parts_rejects_foreign_kinds() {
        assert_eq!(
            ImageOwner::from_parts(MorphType::Post, 3).ok(),
            Some(ImageOwner::Post(3))
        );
        assert!(ImageOwner::from_parts(MorphType::Video, 3).is_err());
        assert!(Commentable::from_parts(MorphType::User, 1).is_err());
        assert_eq!(
            TaggableRef::from_parts(MorphType::Video, 9).ok(),
            Some(TaggableRef::Video(9))
        );
    }

    #[test]
    fn test_serializes_as_tagged_pair() {
        let json = serde_json::to_value(Commentable::Video(7)).unwrap_or_default();
        assert_eq!(json, serde_json::json!({ "type": "video", "id": 7 }));
    }
}
