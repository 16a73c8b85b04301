use sea_orm::entity::prelude::*;

/// Stored value of every `*_type` polymorphic column.
///
/// The strings are the morph-map names; they never change once rows exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum MorphKind {
    #[sea_orm(string_value = "user")]
    User,
    #[sea_orm(string_value = "post")]
    Post,
    #[sea_orm(string_value = "video")]
    Video,
}
