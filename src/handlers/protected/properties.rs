use axum::extract::{Path, State};
use uuid::Uuid;

use crate::database::models::{Property, PropertyInput};
use crate::error::ApiError;
use crate::handlers::utils::{parse_id, ApiJson};
use crate::middleware::{ApiResponse, ApiResult, SessionUser};
use crate::state::AppState;

/// POST /api/properties - the caller becomes the owner
pub async fn create(
    State(state): State<AppState>,
    user: SessionUser,
    ApiJson(input): ApiJson<PropertyInput>,
) -> ApiResult<Property> {
    let owner = user.profile(&state).await?;
    let property = state.store.create_property(owner.id, input).await?;
    tracing::info!(property = %property.id, owner = %owner.id, "Property created");
    Ok(ApiResponse::created(property))
}

/// PUT /api/properties/:id - owner only
pub async fn update(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<PropertyInput>,
) -> ApiResult<Property> {
    let id = parse_id(&id, "property")?;
    owned_property(&state, &user, id).await?;

    let property = state
        .store
        .update_property(id, input)
        .await?
        .ok_or_else(|| ApiError::not_found("Property not found"))?;
    Ok(ApiResponse::success(property))
}

/// DELETE /api/properties/:id - owner only
pub async fn delete(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let id = parse_id(&id, "property")?;
    owned_property(&state, &user, id).await?;

    if !state.store.delete_property(id).await? {
        return Err(ApiError::not_found("Property not found"));
    }
    tracing::info!(property = %id, owner = %user.id, "Property deleted");
    Ok(ApiResponse::fields().with("message", "Property deleted"))
}

async fn owned_property(state: &AppState, user: &SessionUser, id: Uuid) -> Result<Property, ApiError> {
    let property = state
        .store
        .find_property(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Property not found"))?;

    if property.owner != user.id {
        return Err(ApiError::forbidden("Not authorized to modify this property"));
    }
    Ok(property)
}
