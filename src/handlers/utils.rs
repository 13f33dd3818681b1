use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Query};
use axum::Json;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::database::Pagination;
use crate::error::ApiError;

/// `Json` whose rejections use the API error envelope.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// `Query` whose rejections use the API error envelope.
#[derive(FromRequestParts)]
#[from_request(via(Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// Decode an optional JSON body. Empty means `None`; anything else must parse.
pub fn optional_json<T: DeserializeOwned>(body: &Bytes) -> Result<Option<T>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body)
        .map(Some)
        .map_err(|e| ApiError::InvalidJson(format!("Failed to parse the request body as JSON: {}", e)))
}

/// Parse a path or body identifier, 400 when malformed.
pub fn parse_id(raw: &str, what: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::bad_request(format!("Invalid {} ID format", what)))
}

/// Resolved `page` / `limit` of a listing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u64,
    pub limit: u64,
}

impl PageWindow {
    /// Page defaults to 1 and is at least 1; limit is clamped to `[1, max_limit]`.
    pub fn resolve(page: Option<i64>, limit: Option<i64>, default_limit: u32, max_limit: u32) -> Self {
        let max_limit = i64::from(max_limit.max(1));
        let limit = limit.unwrap_or(i64::from(default_limit)).clamp(1, max_limit);
        let page = page.unwrap_or(1).max(1);

        Self {
            page: page as u64,
            limit: limit as u64,
        }
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::page(self.page, self.limit)
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.limit)
    }
}
