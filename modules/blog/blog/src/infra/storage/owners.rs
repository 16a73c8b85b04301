//! Existence checks for polymorphic owners.
//!
//! Polymorphic id columns carry no foreign key, so every insert of a child
//! row checks the owner first.

use blog_db::DbConnTrait;
use blog_sdk::MorphType;
use sea_orm::{EntityTrait, PaginatorTrait};

use crate::domain::error::DomainError;
use crate::infra::storage::db::db_err;
use crate::infra::storage::entity::{post, user, video};

/// Fail with `DomainError::OwnerNotFound` unless the `(kind, id)` row exists.
/// Soft-deleted posts still count as existing rows.
pub(super) async fn ensure_owner_exists<C: DbConnTrait + Send + Sync>(
    conn: &C,
    (kind, id): (MorphType, i64),
) -> Result<(), DomainError> {
    let found = match kind {
        MorphType::User => user::Entity::find_by_id(id).count(conn).await,
        MorphType::Post => post::Entity::find_by_id(id).count(conn).await,
        MorphType::Video => video::Entity::find_by_id(id).count(conn).await,
    }
    .map_err(db_err)?;

    if found == 0 {
        return Err(DomainError::OwnerNotFound { kind, id });
    }
    Ok(())
}
