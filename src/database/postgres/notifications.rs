use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::{count, limit_offset, PgStore};
use crate::database::manager::DatabaseError;
use crate::database::models::{NewNotification, Notification};
use crate::database::store::{NotificationStore, Pagination};

#[derive(FromRow)]
struct NotificationRow {
    id: Uuid,
    user_id: Uuid,
    message: String,
    is_read: bool,
    link: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<NotificationRow> for Notification {
    fn from(row: NotificationRow) -> Self {
        Notification {
            id: row.id,
            user: row.user_id,
            message: row.message,
            is_read: row.is_read,
            link: row.link,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl NotificationStore for PgStore {
    async fn list_notifications(
        &self,
        user: Uuid,
        page: Pagination,
    ) -> Result<Vec<Notification>, DatabaseError> {
        let (limit, offset) = limit_offset(page);
        let rows: Vec<NotificationRow> = sqlx::query_as(
            r#"
            SELECT * FROM notifications
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Notification::from).collect())
    }

    async fn count_notifications(&self, user: Uuid) -> Result<u64, DatabaseError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE user_id = $1")
            .bind(user)
            .fetch_one(&self.pool)
            .await?;
        Ok(count(total))
    }

    async fn count_unread(&self, user: Uuid) -> Result<u64, DatabaseError> {
        let unread: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND NOT is_read",
        )
        .bind(user)
        .fetch_one(&self.pool)
        .await?;
        Ok(count(unread))
    }

    async fn find_notification(&self, id: Uuid) -> Result<Option<Notification>, DatabaseError> {
        let row: Option<NotificationRow> = sqlx::query_as("SELECT * FROM notifications WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Notification::from))
    }

    async fn set_notification_read(
        &self,
        id: Uuid,
        is_read: bool,
    ) -> Result<Option<Notification>, DatabaseError> {
        // updated_at only moves when the flag actually changes
        let row: Option<NotificationRow> = sqlx::query_as(
            r#"
            UPDATE notifications
            SET updated_at = CASE WHEN is_read = $2 THEN updated_at ELSE now() END,
                is_read = $2
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(is_read)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Notification::from))
    }

    async fn mark_all_read(&self, user: Uuid) -> Result<u64, DatabaseError> {
        let modified = sqlx::query(
            "UPDATE notifications SET is_read = true, updated_at = now() WHERE user_id = $1 AND NOT is_read",
        )
        .bind(user)
        .execute(&self.pool)
        .await?
        .rows_affected();
        Ok(modified)
    }

    async fn create_notification(&self, notification: NewNotification) -> Result<Notification, DatabaseError> {
        notification.validate()?;
        let row: NotificationRow = sqlx::query_as(
            "INSERT INTO notifications (user_id, message, link) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(notification.user)
        .bind(&notification.message)
        .bind(&notification.link)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::missing_reference(e, "User not found"))?;
        Ok(row.into())
    }

    async fn delete_notification(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let deleted = sqlx::query("DELETE FROM notifications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(deleted > 0)
    }
}
