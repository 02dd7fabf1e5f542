//! PostgreSQL implementation of the API key repository.

use async_trait::async_trait;
use serde_json::json;
use sqlx::{PgPool, Row};
use std::sync::Arc;

use crate::domain::repositories::{ApiKey, KeyRepository};
use crate::error::AppError;

/// PostgreSQL repository for credential-hash lookups.
pub struct PgKeyRepository {
    pool: Arc<PgPool>,
}

impl PgKeyRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KeyRepository for PgKeyRepository {
    async fn resolve(&self, key_hash: &str) -> Result<Option<String>, AppError> {
        let row = sqlx::query(
            "SELECT owner FROM api_keys WHERE key_hash = $1 AND revoked_at IS NULL",
        )
        .bind(key_hash)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(|r| r.try_get("owner")).transpose()?)
    }

    async fn touch(&self, key_hash: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE api_keys SET last_used_at = now() WHERE key_hash = $1")
            .bind(key_hash)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn register(&self, key_hash: &str, owner: &str, label: &str) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO api_keys (key_hash, owner, label)
            VALUES ($1, $2, $3)
            ON CONFLICT (key_hash) DO NOTHING
            "#,
        )
        .bind(key_hash)
        .bind(owner)
        .bind(label)
        .execute(self.pool.as_ref())
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::conflict(
                "API key already registered",
                json!({ "owner": owner }),
            ));
        }

        Ok(())
    }

    async fn revoke(&self, key_hash: &str) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE api_keys SET revoked_at = now() WHERE key_hash = $1 AND revoked_at IS NULL",
        )
        .bind(key_hash)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_by_owner(&self, owner: &str) -> Result<Vec<ApiKey>, AppError> {
        let rows = sqlx::query(
            r#"
            SELECT key_hash, owner, label, revoked_at IS NOT NULL AS revoked
            FROM api_keys
            WHERE owner = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner)
        .fetch_all(self.pool.as_ref())
        .await?;

        let mut keys = Vec::with_capacity(rows.len());
        for row in rows {
            keys.push(ApiKey {
                key_hash: row.try_get("key_hash")?,
                owner: row.try_get("owner")?,
                label: row.try_get("label")?,
                revoked: row.try_get("revoked")?,
            });
        }

        Ok(keys)
    }
}
