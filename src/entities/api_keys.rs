use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "api_keys")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Credential presented by callers; matched exactly (case-sensitive).
    #[sea_orm(unique)]
    pub key: String,

    /// Owner of the key; opaque to this service.
    pub user_id: String,

    pub created_at: String,

    /// Only active keys admit requests.
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
