use crate::entities::prelude::*;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Bootstrap API key seeded into a fresh database. Rotate it out-of-band.
const DEFAULT_API_KEY: &str = "zooda_default_api_key_please_rotate";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(Anime)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(ApiKeys)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(ApiUsage)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Seed one active key so a fresh deployment accepts requests.
        let now = chrono::Utc::now().to_rfc3339();

        let insert = sea_orm_migration::sea_query::Query::insert()
            .into_table(ApiKeys)
            .columns([
                crate::entities::api_keys::Column::Key,
                crate::entities::api_keys::Column::UserId,
                crate::entities::api_keys::Column::CreatedAt,
                crate::entities::api_keys::Column::IsActive,
            ])
            .values_panic([
                DEFAULT_API_KEY.into(),
                "admin".into(),
                now.into(),
                true.into(),
            ])
            .to_owned();

        manager.exec_stmt(insert).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ApiUsage).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ApiKeys).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Anime).to_owned())
            .await?;

        Ok(())
    }
}
