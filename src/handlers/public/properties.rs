use axum::extract::{Path, State};
use serde::Deserialize;

use crate::database::models::{Property, PropertySearch};
use crate::error::ApiError;
use crate::handlers::utils::{parse_id, ApiQuery, PageWindow};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// GET /api/properties?page&pageSize - newest listings first
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> ApiResult<()> {
    let window = PageWindow::resolve(
        query.page,
        query.page_size,
        state.config.api.property_page_size,
        state.config.api.max_page_limit,
    );
    let (properties, total) = state.store.list_properties(window.pagination()).await?;

    Ok(ApiResponse::fields()
        .with("total", total)
        .with("properties", properties))
}

/// GET /api/properties/featured
pub async fn featured(State(state): State<AppState>) -> ApiResult<Vec<Property>> {
    let properties = state.store.featured_properties().await?;
    Ok(ApiResponse::success(properties))
}

/// GET /api/properties/search?location&propertyType
pub async fn search(
    State(state): State<AppState>,
    ApiQuery(search): ApiQuery<PropertySearch>,
) -> ApiResult<Vec<Property>> {
    let properties = state.store.search_properties(&search).await?;
    tracing::debug!(
        location = ?search.location(),
        property_type = ?search.property_type(),
        matches = properties.len(),
        "Property search"
    );
    Ok(ApiResponse::success(properties))
}

/// GET /api/properties/user/:userId - an owner's listings
pub async fn by_owner(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Vec<Property>> {
    let owner = parse_id(&user_id, "user")?;
    let properties = state.store.properties_by_owner(owner).await?;
    Ok(ApiResponse::success(properties))
}

/// GET /api/properties/:id
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Property> {
    let id = parse_id(&id, "property")?;
    let property = state
        .store
        .find_property(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Property not found"))?;
    Ok(ApiResponse::success(property))
}
