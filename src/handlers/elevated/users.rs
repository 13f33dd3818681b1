use axum::extract::{Path, State};
use serde::Deserialize;

use crate::database::models::{Role, User, ValidationErrors};
use crate::error::ApiError;
use crate::handlers::utils::{parse_id, ApiJson};
use crate::middleware::{ApiResponse, ApiResult, SessionUser};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RoleRequest {
    pub role: String,
}

/// GET /api/users - admin/hr/pm
pub async fn list(State(state): State<AppState>, user: SessionUser) -> ApiResult<Vec<User>> {
    user.require_role(&[Role::Admin, Role::Hr, Role::Pm])?;
    let users = state.store.list_users().await?;
    Ok(ApiResponse::success(users))
}

/// PUT /api/users/:id/role - admin only
pub async fn set_role(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<RoleRequest>,
) -> ApiResult<User> {
    user.require_role(&[Role::Admin])?;
    let id = parse_id(&id, "user")?;

    let role: Role = body.role.trim().parse().map_err(|msg: String| {
        let mut errors = ValidationErrors::default();
        errors.push(msg);
        ApiError::from(errors)
    })?;

    let updated = state
        .store
        .set_user_role(id, role)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    tracing::info!(user = %updated.id, role = %role, by = %user.id, "User role changed");
    Ok(ApiResponse::success(updated))
}
