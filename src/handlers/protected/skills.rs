use axum::extract::{Path, State};

use crate::database::models::{NewSkill, Role, Skill};
use crate::error::ApiError;
use crate::handlers::utils::{parse_id, ApiJson};
use crate::middleware::{ApiResponse, ApiResult, SessionUser};
use crate::state::AppState;

/// GET /api/skills - by category, then name
pub async fn list(State(state): State<AppState>, _user: SessionUser) -> ApiResult<Vec<Skill>> {
    let skills = state.store.list_skills().await?;
    Ok(ApiResponse::success(skills))
}

/// POST /api/skills - names are unique ignoring case
pub async fn create(
    State(state): State<AppState>,
    user: SessionUser,
    ApiJson(skill): ApiJson<NewSkill>,
) -> ApiResult<Skill> {
    let skill = state.store.create_skill(skill).await?;
    tracing::info!(skill = %skill.id, name = %skill.name, by = %user.id, "Skill created");
    Ok(ApiResponse::created(skill))
}

/// DELETE /api/skills/:id - admin only, drops every rating of the skill
pub async fn delete(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<String>,
) -> ApiResult<()> {
    user.require_role(&[Role::Admin])?;
    let id = parse_id(&id, "skill")?;

    if !state.store.delete_skill(id).await? {
        return Err(ApiError::not_found("Skill not found"));
    }
    tracing::info!(skill = %id, by = %user.id, "Skill deleted");
    Ok(ApiResponse::fields().with("message", "Skill deleted"))
}
