use axum::body::Bytes;
use axum::extract::{Path, State};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::Notification;
use crate::error::ApiError;
use crate::handlers::utils::{optional_json, parse_id, ApiQuery, PageWindow};
use crate::middleware::{ApiResponse, ApiResult, SessionUser};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub page: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MarkRequest {
    pub is_read: Option<bool>,
}

/// GET /api/notifications?limit&page - the caller's notifications, newest first
pub async fn list(
    State(state): State<AppState>,
    user: SessionUser,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> ApiResult<Vec<Notification>> {
    let window = PageWindow::resolve(
        query.page,
        query.limit,
        state.config.api.default_page_limit,
        state.config.api.max_page_limit,
    );

    let notifications = state.store.list_notifications(user.id, window.pagination()).await?;
    let total = state.store.count_notifications(user.id).await?;
    let unread = state.store.count_unread(user.id).await?;

    Ok(ApiResponse::success(notifications)
        .with("unreadCount", unread)
        .with("totalNotifications", total)
        .with("currentPage", window.page)
        .with("totalPages", window.total_pages(total)))
}

/// GET /api/notifications/count - unread count, zero without a session
pub async fn count(State(state): State<AppState>, user: Option<SessionUser>) -> ApiResult<()> {
    let count = match user {
        Some(user) => state.store.count_unread(user.id).await?,
        None => 0,
    };
    Ok(ApiResponse::fields().with("count", count))
}

/// PUT /api/notifications/:id - set the read flag (default true)
pub async fn mark(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Notification> {
    let id = parse_id(&id, "notification")?;
    let is_read = optional_json::<MarkRequest>(&body)?
        .and_then(|body| body.is_read)
        .unwrap_or(true);

    let notification = owned_notification(&state, &user, id).await?;
    if notification.is_read == is_read {
        return Ok(ApiResponse::success(notification).with("updated", false));
    }

    let updated = state
        .store
        .set_notification_read(id, is_read)
        .await?
        .ok_or_else(|| ApiError::not_found("Notification not found"))?;

    Ok(ApiResponse::success(updated).with("updated", true))
}

/// POST /api/notifications/mark-as-read - mark every unread notification read
pub async fn mark_all(State(state): State<AppState>, user: SessionUser) -> ApiResult<()> {
    let modified = state.store.mark_all_read(user.id).await?;
    tracing::debug!(user = %user.id, modified, "Marked notifications read");
    Ok(ApiResponse::fields().with("modifiedCount", modified))
}

/// DELETE /api/notifications/:id
pub async fn delete(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let id = parse_id(&id, "notification")?;
    owned_notification(&state, &user, id).await?;

    if !state.store.delete_notification(id).await? {
        return Err(ApiError::not_found("Notification not found"));
    }
    Ok(ApiResponse::fields().with("message", "Notification deleted"))
}

async fn owned_notification(
    state: &AppState,
    user: &SessionUser,
    id: Uuid,
) -> Result<Notification, ApiError> {
    let notification = state
        .store
        .find_notification(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Notification not found"))?;

    if !notification.is_owned_by(user.id) {
        tracing::warn!(user = %user.id, notification = %id, "Notification belongs to another user");
        return Err(ApiError::forbidden("Not authorized to modify this notification"));
    }
    Ok(notification)
}
