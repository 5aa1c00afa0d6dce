use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "api_usage")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Key presented with the request; None for anonymous traffic.
    pub key: Option<String>,
    pub endpoint: String,
    pub method: String,
    pub status: i32,
    pub latency_ms: i64,
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
