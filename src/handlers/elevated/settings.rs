use axum::extract::State;

use crate::database::models::{Role, Settings, SettingsUpdate};
use crate::handlers::utils::ApiJson;
use crate::middleware::{ApiResponse, ApiResult, SessionUser};
use crate::state::AppState;

const SETTINGS_ROLES: [Role; 2] = [Role::Admin, Role::Hr];

/// GET /api/settings
pub async fn show(State(state): State<AppState>, user: SessionUser) -> ApiResult<Settings> {
    user.require_role(&SETTINGS_ROLES)?;
    let settings = state.store.load_settings().await?;
    Ok(ApiResponse::success(settings))
}

/// PUT /api/settings - partial update of the singleton
pub async fn update(
    State(state): State<AppState>,
    user: SessionUser,
    ApiJson(update): ApiJson<SettingsUpdate>,
) -> ApiResult<Settings> {
    user.require_role(&SETTINGS_ROLES)?;

    let current = state.store.load_settings().await?;
    let settings = state.store.save_settings(update.apply(current)?).await?;

    tracing::info!(by = %user.id, "Settings updated");
    Ok(ApiResponse::success(settings))
}
