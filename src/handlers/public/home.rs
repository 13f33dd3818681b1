use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET / - service description
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Keystone API",
            "version": version,
            "description": "Rental listings and resource management API",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "properties": "/api/properties[/featured|/search|/user/:userId|/:id] (public reads, owner writes)",
                "bookmarks": "/api/bookmarks[/check] (session)",
                "notifications": "/api/notifications[/count|/mark-as-read|/:id] (session)",
                "skills": "/api/skills[/:id] (session, delete admin)",
                "user_skills": "/api/user-skills[/:id] (session)",
                "projects": "/api/projects[/:id] (session, create admin/pm)",
                "allocations": "/api/allocations[/:id] (session, writes admin/pm)",
                "settings": "/api/settings (admin/hr)",
                "users": "/api/users[/:id/role] (admin/hr/pm, role changes admin)",
                "auth": "/api/auth/session (session)",
            }
        }
    }))
}

/// GET /health - liveness plus a store ping
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "code": "SERVICE_UNAVAILABLE",
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
        }
    }
}
