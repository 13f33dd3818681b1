use axum::extract::State;
use serde::Serialize;
use uuid::Uuid;

use crate::database::models::{Role, User};
use crate::middleware::{ApiResponse, ApiResult, SessionUser};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub profile: User,
}

/// GET /api/auth/session - the resolved session user
pub async fn session(State(state): State<AppState>, user: SessionUser) -> ApiResult<SessionView> {
    let profile = user.profile(&state).await?;

    Ok(ApiResponse::success(SessionView {
        id: user.id,
        email: user.email,
        name: user.name,
        role: user.role,
        profile,
    }))
}
