//! PostgreSQL implementation of the link repository.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::sync::Arc;

use crate::domain::entities::{Link, LinkStatus, NewLink};
use crate::domain::repositories::{CreateOutcome, LinkRepository};
use crate::error::AppError;

/// PostgreSQL repository for link storage and retrieval.
///
/// Atomicity lives in single statements: `INSERT … ON CONFLICT DO NOTHING`
/// for insert-if-absent, `SET usage_count = usage_count + 1` for the counter.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

const LINK_COLUMNS: &str = "id, code, long_url, status, usage_count, owner, credential, created_at";

fn link_from_row(row: &PgRow) -> Result<Link, sqlx::Error> {
    let status: String = row.try_get("status")?;
    Ok(Link::new(
        row.try_get("id")?,
        row.try_get("code")?,
        row.try_get("long_url")?,
        LinkStatus::from_str_lossy(&status),
        row.try_get("usage_count")?,
        row.try_get("owner")?,
        row.try_get("credential")?,
        row.try_get("created_at")?,
    ))
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<CreateOutcome, AppError> {
        let sql = format!(
            r#"
            INSERT INTO links (code, long_url, owner, credential)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (code) DO NOTHING
            RETURNING {LINK_COLUMNS}
            "#
        );

        let row = sqlx::query(&sql)
            .bind(&new_link.code)
            .bind(&new_link.long_url)
            .bind(&new_link.owner)
            .bind(&new_link.credential)
            .fetch_optional(self.pool.as_ref())
            .await?;

        match row {
            Some(row) => Ok(CreateOutcome::Created(link_from_row(&row)?)),
            None => Ok(CreateOutcome::AlreadyExists),
        }
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let sql = format!("SELECT {LINK_COLUMNS} FROM links WHERE code = $1");

        let row = sqlx::query(&sql)
            .bind(code)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.as_ref().map(link_from_row).transpose()?)
    }

    async fn increment_usage(&self, code: &str) -> Result<Option<i64>, AppError> {
        let row = sqlx::query(
            r#"
            UPDATE links
            SET usage_count = usage_count + 1
            WHERE code = $1
            RETURNING usage_count
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(|r| r.try_get("usage_count")).transpose()?)
    }

    async fn list_by_owner(
        &self,
        owner: &str,
        limit: i64,
        after: Option<i64>,
    ) -> Result<Vec<Link>, AppError> {
        let sql = format!(
            r#"
            SELECT {LINK_COLUMNS}
            FROM links
            WHERE owner = $1 AND ($2::bigint IS NULL OR id < $2)
            ORDER BY id DESC
            LIMIT $3
            "#
        );

        let rows = sqlx::query(&sql)
            .bind(owner)
            .bind(after)
            .bind(limit)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows
            .iter()
            .map(link_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn set_status(&self, code: &str, status: LinkStatus) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE links SET status = $2 WHERE code = $1")
            .bind(code)
            .bind(status.as_str())
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
