use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use super::PgStore;
use crate::database::manager::DatabaseError;
use crate::database::models::Settings;
use crate::database::store::SettingsStore;

#[derive(FromRow)]
struct SettingsRow {
    organization_name: String,
    max_allocation_percent: i16,
    allow_self_assessment: bool,
    updated_at: Option<DateTime<Utc>>,
}

impl From<SettingsRow> for Settings {
    fn from(row: SettingsRow) -> Self {
        Settings {
            organization_name: row.organization_name,
            max_allocation_percent: row.max_allocation_percent,
            allow_self_assessment: row.allow_self_assessment,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl SettingsStore for PgStore {
    async fn load_settings(&self) -> Result<Settings, DatabaseError> {
        let row: Option<SettingsRow> = sqlx::query_as(
            r#"
            SELECT organization_name, max_allocation_percent, allow_self_assessment, updated_at
            FROM settings WHERE id = 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Settings::from).unwrap_or_default())
    }

    async fn save_settings(&self, settings: Settings) -> Result<Settings, DatabaseError> {
        let row: SettingsRow = sqlx::query_as(
            r#"
            INSERT INTO settings (id, organization_name, max_allocation_percent, allow_self_assessment, updated_at)
            VALUES (1, $1, $2, $3, now())
            ON CONFLICT (id) DO UPDATE
            SET organization_name = EXCLUDED.organization_name,
                max_allocation_percent = EXCLUDED.max_allocation_percent,
                allow_self_assessment = EXCLUDED.allow_self_assessment,
                updated_at = EXCLUDED.updated_at
            RETURNING organization_name, max_allocation_percent, allow_self_assessment, updated_at
            "#,
        )
        .bind(&settings.organization_name)
        .bind(settings.max_allocation_percent)
        .bind(settings.allow_self_assessment)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }
}
