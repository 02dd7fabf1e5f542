//! PostgreSQL implementation of the click ledger.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::sync::Arc;

use crate::domain::entities::{Click, DeviceClass, NewClick};
use crate::domain::repositories::ClickRepository;
use crate::error::AppError;

/// PostgreSQL repository for the append-only click ledger.
pub struct PgClickRepository {
    pool: Arc<PgPool>,
}

impl PgClickRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

fn click_from_row(row: &PgRow) -> Result<Click, sqlx::Error> {
    let device: String = row.try_get("device")?;
    Ok(Click {
        code: row.try_get("code")?,
        clicked_at: row.try_get("clicked_at")?,
        referrer: row.try_get("referrer")?,
        user_agent: row.try_get("user_agent")?,
        ip: row.try_get("ip")?,
        country: row.try_get("country")?,
        device: DeviceClass::from_str_lossy(&device),
        owner: row.try_get("owner")?,
    })
}

#[async_trait]
impl ClickRepository for PgClickRepository {
    async fn record(&self, new_click: NewClick) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO link_clicks
                (code, clicked_at, referrer, user_agent, ip, country, device, owner)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(&new_click.code)
        .bind(new_click.clicked_at)
        .bind(&new_click.referrer)
        .bind(&new_click.user_agent)
        .bind(&new_click.ip)
        .bind(&new_click.country)
        .bind(new_click.device.as_str())
        .bind(&new_click.owner)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn list_for_code_since(
        &self,
        code: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<Click>, AppError> {
        let rows = sqlx::query(
            r#"
            SELECT code, clicked_at, referrer, user_agent, ip, country, device, owner
            FROM link_clicks
            WHERE code = $1 AND clicked_at >= $2
            ORDER BY clicked_at DESC
            "#,
        )
        .bind(code)
        .bind(since)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .iter()
            .map(click_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }
}
