use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::Claims;
use crate::database::models::{NewUser, Role, User};
use crate::error::ApiError;
use crate::state::AppState;

/// Caller identity resolved from a verified session token
#[derive(Clone, Debug)]
pub struct SessionUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
}

impl From<Claims> for SessionUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            name: claims.name,
            role: claims.role,
        }
    }
}

impl SessionUser {
    /// 403 unless the caller holds one of `allowed`.
    pub fn require_role(&self, allowed: &[Role]) -> Result<(), ApiError> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            tracing::warn!(user = %self.id, role = %self.role, "Role not permitted");
            Err(ApiError::forbidden("Forbidden"))
        }
    }

    pub fn has_role(&self, allowed: &[Role]) -> bool {
        allowed.contains(&self.role)
    }

    /// The caller's stored user, created from the session on first use.
    pub async fn profile(&self, state: &AppState) -> Result<User, ApiError> {
        let user = state
            .store
            .find_or_create_user(
                self.id,
                NewUser {
                    email: self.email.clone(),
                    name: self.name.clone(),
                    image: None,
                    role: self.role,
                },
            )
            .await?;
        Ok(user)
    }
}

/// Resolves the optional session user for every request. Never rejects:
/// handlers that need a session extract [`SessionUser`] and get a 401.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = session_token(request.headers(), &state.config.security.session_cookie) {
        match state.sessions.verify(&token) {
            Ok(claims) => {
                let user = SessionUser::from(claims);
                tracing::debug!(user = %user.id, role = %user.role, "Session resolved");
                request.extensions_mut().insert(user);
            }
            Err(e) => tracing::debug!("Ignoring session token: {}", e),
        }
    }

    next.run(request).await
}

/// Bearer token first, then the session cookie.
fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());

    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == cookie_name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionUser>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Unauthorized"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_header_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        headers.insert(header::COOKIE, HeaderValue::from_static("session-token=xyz"));
        assert_eq!(session_token(&headers, "session-token").as_deref(), Some("abc"));
    }

    #[test]
    fn cookie_is_found_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; session-token=xyz; lang=en"),
        );
        assert_eq!(session_token(&headers, "session-token").as_deref(), Some("xyz"));
        assert_eq!(session_token(&headers, "other"), None);
    }

    #[test]
    fn non_bearer_authorization_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcg=="));
        assert_eq!(session_token(&headers, "session-token"), None);
    }

    #[test]
    fn roles_are_checked_against_allow_list() {
        let user = SessionUser {
            id: Uuid::new_v4(),
            email: "hr@example.com".into(),
            name: "Hana".into(),
            role: Role::Hr,
        };
        assert!(user.require_role(&[Role::Admin, Role::Hr]).is_ok());
        let err = user.require_role(&[Role::Admin]).unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::FORBIDDEN);
    }
}
