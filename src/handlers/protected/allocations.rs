use axum::extract::{Path, State};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{Allocation, AllocationFilter, AllocationInput, NewNotification, Role};
use crate::error::ApiError;
use crate::handlers::utils::{parse_id, ApiJson, ApiQuery};
use crate::middleware::{ApiResponse, ApiResult, SessionUser};
use crate::state::AppState;

const PLANNERS: [Role; 2] = [Role::Admin, Role::Pm];

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListQuery {
    pub user_id: Option<String>,
    pub project_id: Option<String>,
}

/// GET /api/allocations?userId&projectId
pub async fn list(
    State(state): State<AppState>,
    _user: SessionUser,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> ApiResult<Vec<Allocation>> {
    let filter = AllocationFilter {
        user: optional_id(query.user_id.as_deref(), "user")?,
        project: optional_id(query.project_id.as_deref(), "project")?,
    };

    let allocations = state.store.list_allocations(filter).await?;
    Ok(ApiResponse::success(allocations))
}

/// POST /api/allocations - admin/pm; the allocated user is notified
pub async fn create(
    State(state): State<AppState>,
    user: SessionUser,
    ApiJson(input): ApiJson<AllocationInput>,
) -> ApiResult<Allocation> {
    user.require_role(&PLANNERS)?;

    let user_id = parse_id(&input.user_id, "user")?;
    let project_id = parse_id(&input.project_id, "project")?;

    let settings = state.store.load_settings().await?;
    let allocation = input.into_new(user_id, project_id, settings.max_allocation_percent)?;

    if state.store.find_user(user_id).await?.is_none() {
        return Err(ApiError::not_found("User not found"));
    }
    let project = state
        .store
        .find_project(project_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Project not found"))?;

    let allocation = state.store.create_allocation(allocation).await?;
    tracing::info!(
        allocation = %allocation.id,
        user = %allocation.user,
        project = %allocation.project,
        percentage = allocation.percentage,
        "Allocation created"
    );

    let notification = NewNotification::new(
        allocation.user,
        format!(
            "You have been allocated to {} as {} ({}%)",
            project.name, allocation.role, allocation.percentage
        ),
        Some(format!("/projects/{}", project.id)),
    );
    if let Err(e) = state.store.create_notification(notification).await {
        tracing::warn!(allocation = %allocation.id, "Failed to notify allocated user: {}", e);
    }

    Ok(ApiResponse::created(allocation))
}

/// DELETE /api/allocations/:id - admin/pm
pub async fn delete(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<String>,
) -> ApiResult<()> {
    user.require_role(&PLANNERS)?;
    let id = parse_id(&id, "allocation")?;

    if !state.store.delete_allocation(id).await? {
        return Err(ApiError::not_found("Allocation not found"));
    }
    Ok(ApiResponse::fields().with("message", "Allocation deleted"))
}

fn optional_id(raw: Option<&str>, what: &str) -> Result<Option<Uuid>, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => parse_id(raw, what).map(Some),
        None => Ok(None),
    }
}
