use axum::extract::State;
use serde::Deserialize;

use crate::database::models::Property;
use crate::error::ApiError;
use crate::handlers::utils::{parse_id, ApiJson};
use crate::middleware::{ApiResponse, ApiResult, SessionUser};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BookmarkRequest {
    pub property_id: String,
}

/// POST /api/bookmarks/check - is the property in the caller's bookmarks
pub async fn check(
    State(state): State<AppState>,
    user: SessionUser,
    ApiJson(body): ApiJson<BookmarkRequest>,
) -> ApiResult<()> {
    let property = parse_id(&body.property_id, "property")?;
    let profile = user.profile(&state).await?;

    Ok(ApiResponse::fields().with("isBookmarked", profile.has_bookmarked(property)))
}

/// POST /api/bookmarks - add or remove a bookmark
pub async fn toggle(
    State(state): State<AppState>,
    user: SessionUser,
    ApiJson(body): ApiJson<BookmarkRequest>,
) -> ApiResult<()> {
    let property = parse_id(&body.property_id, "property")?;

    if state.store.find_property(property).await?.is_none() {
        return Err(ApiError::not_found("Property not found"));
    }

    let profile = user.profile(&state).await?;
    let bookmarked = state.store.toggle_bookmark(profile.id, property).await?;
    let message = if bookmarked {
        "Bookmark added successfully"
    } else {
        "Bookmark removed successfully"
    };

    Ok(ApiResponse::fields()
        .with("message", message)
        .with("isBookmarked", bookmarked))
}

/// GET /api/bookmarks - the caller's bookmarked properties
pub async fn list(State(state): State<AppState>, user: SessionUser) -> ApiResult<Vec<Property>> {
    let profile = user.profile(&state).await?;
    let properties = state.store.find_properties(&profile.bookmarks).await?;
    Ok(ApiResponse::success(properties))
}
