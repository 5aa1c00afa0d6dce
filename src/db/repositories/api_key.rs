use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::Serialize;
use tracing::info;

use crate::entities::{api_keys, prelude::*};

/// Key record as exposed by the debug listing (row ids stay internal).
#[derive(Debug, Clone, Serialize)]
pub struct ApiKeyInfo {
    pub key: String,
    pub user_id: String,
    pub created_at: String,
    pub is_active: bool,
}

impl From<api_keys::Model> for ApiKeyInfo {
    fn from(model: api_keys::Model) -> Self {
        Self {
            key: model.key,
            user_id: model.user_id,
            created_at: model.created_at,
            is_active: model.is_active,
        }
    }
}

pub struct ApiKeyRepository {
    conn: DatabaseConnection,
}

impl ApiKeyRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Find the key row matching the presented credential exactly
    /// (case-sensitive, no trimming) with the active flag set.
    pub async fn find_active(&self, key: &str) -> Result<Option<ApiKeyInfo>> {
        let row = ApiKeys::find()
            .filter(api_keys::Column::Key.eq(key))
            .filter(api_keys::Column::IsActive.eq(true))
            .one(&self.conn)
            .await
            .context("Failed to query API key")?;

        Ok(row.map(ApiKeyInfo::from))
    }

    pub async fn list_all(&self) -> Result<Vec<ApiKeyInfo>> {
        let rows = ApiKeys::find()
            .order_by_asc(api_keys::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list API keys")?;

        Ok(rows.into_iter().map(ApiKeyInfo::from).collect())
    }

    pub async fn insert(&self, key: &str, user_id: &str, is_active: bool) -> Result<ApiKeyInfo> {
        let active_model = api_keys::ActiveModel {
            key: Set(key.to_string()),
            user_id: Set(user_id.to_string()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            is_active: Set(is_active),
            ..Default::default()
        };

        let model = active_model
            .insert(&self.conn)
            .await
            .context("Failed to insert API key")?;

        info!("Provisioned API key for {}", model.user_id);
        Ok(ApiKeyInfo::from(model))
    }

    /// Flip the active flag on an existing key. Keys are never deleted;
    /// deactivation is the only revocation mechanism.
    pub async fn set_active(&self, key: &str, is_active: bool) -> Result<bool> {
        let row = ApiKeys::find()
            .filter(api_keys::Column::Key.eq(key))
            .one(&self.conn)
            .await
            .context("Failed to query API key")?;

        let Some(row) = row else {
            return Ok(false);
        };

        let mut active: api_keys::ActiveModel = row.into();
        active.is_active = Set(is_active);
        active.update(&self.conn).await?;

        Ok(true)
    }

    pub async fn count(&self) -> Result<u64> {
        ApiKeys::find()
            .count(&self.conn)
            .await
            .context("Failed to count API keys")
    }

    pub async fn count_active(&self) -> Result<u64> {
        ApiKeys::find()
            .filter(api_keys::Column::IsActive.eq(true))
            .count(&self.conn)
            .await
            .context("Failed to count active API keys")
    }
}
