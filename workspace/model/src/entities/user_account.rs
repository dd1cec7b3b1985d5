use sea_orm::entity::prelude::*;

/// A user account record.
///
/// `id` is assigned by the store on insert and never changes afterwards.
/// Every other column is a plain string; an empty string is a legal value.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user_accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub id_number: String,
    pub full_name: String,
    pub username: String,
    /// Stored as received. Hashing is outside the scope of this service.
    pub password: String,
    pub section: String,
    pub role: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
