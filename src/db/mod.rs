use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::entities::anime;

pub mod migrator;
pub mod repositories;

pub use repositories::anime::NewAnime;
pub use repositories::api_key::ApiKeyInfo;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        // SQLite needs the database file (and its parent directory) to
        // exist before the pool opens; other backends manage their own.
        if let Some(path_str) = db_url.strip_prefix("sqlite:")
            && !path_str.starts_with(":memory:")
        {
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn anime_repo(&self) -> repositories::anime::AnimeRepository {
        repositories::anime::AnimeRepository::new(self.conn.clone())
    }

    fn api_key_repo(&self) -> repositories::api_key::ApiKeyRepository {
        repositories::api_key::ApiKeyRepository::new(self.conn.clone())
    }

    fn usage_repo(&self) -> repositories::usage::UsageRepository {
        repositories::usage::UsageRepository::new(self.conn.clone())
    }

    pub async fn list_anime(&self, skip: u64, limit: i64) -> Result<(Vec<anime::Model>, u64)> {
        self.anime_repo().list(skip, limit).await
    }

    pub async fn search_anime(
        &self,
        title: Option<&str>,
        genre: Option<&str>,
        skip: u64,
        limit: i64,
    ) -> Result<(Vec<anime::Model>, u64)> {
        self.anime_repo().search(title, genre, skip, limit).await
    }

    pub async fn get_anime(&self, id: i32) -> Result<Option<anime::Model>> {
        self.anime_repo().get(id).await
    }

    pub async fn anime_count(&self) -> Result<u64> {
        self.anime_repo().count().await
    }

    pub async fn insert_anime(&self, record: NewAnime) -> Result<anime::Model> {
        self.anime_repo().insert(record).await
    }

    pub async fn seed_sample_catalog(&self) -> Result<u64> {
        self.anime_repo().seed_sample().await
    }

    pub async fn clear_catalog(&self) -> Result<u64> {
        self.anime_repo().clear().await
    }

    pub async fn find_active_key(&self, key: &str) -> Result<Option<ApiKeyInfo>> {
        self.api_key_repo().find_active(key).await
    }

    pub async fn list_api_keys(&self) -> Result<Vec<ApiKeyInfo>> {
        self.api_key_repo().list_all().await
    }

    pub async fn insert_api_key(
        &self,
        key: &str,
        user_id: &str,
        is_active: bool,
    ) -> Result<ApiKeyInfo> {
        self.api_key_repo().insert(key, user_id, is_active).await
    }

    pub async fn set_api_key_active(&self, key: &str, is_active: bool) -> Result<bool> {
        self.api_key_repo().set_active(key, is_active).await
    }

    pub async fn api_key_count(&self) -> Result<u64> {
        self.api_key_repo().count().await
    }

    pub async fn active_api_key_count(&self) -> Result<u64> {
        self.api_key_repo().count_active().await
    }

    pub async fn record_usage(
        &self,
        key: Option<String>,
        endpoint: &str,
        method: &str,
        status: i32,
        latency_ms: i64,
    ) -> Result<()> {
        self.usage_repo()
            .record(key, endpoint, method, status, latency_ms)
            .await
    }
}
