use anyhow::{Context, Result};
use sea_orm::{DatabaseConnection, EntityTrait, Set};

use crate::entities::{api_usage, prelude::*};

pub struct UsageRepository {
    conn: DatabaseConnection,
}

impl UsageRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn record(
        &self,
        key: Option<String>,
        endpoint: &str,
        method: &str,
        status: i32,
        latency_ms: i64,
    ) -> Result<()> {
        let active_model = api_usage::ActiveModel {
            key: Set(key),
            endpoint: Set(endpoint.to_string()),
            method: Set(method.to_string()),
            status: Set(status),
            latency_ms: Set(latency_ms),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        ApiUsage::insert(active_model)
            .exec(&self.conn)
            .await
            .context("Failed to record API usage")?;
        Ok(())
    }
}
