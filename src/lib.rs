pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::state::AppState;

/// The full HTTP application over `state`.
pub fn app(state: AppState) -> Router {
    use handlers::public::home;

    let router = Router::new()
        // Public
        .route("/", get(home::root))
        .route("/health", get(home::health))
        .merge(property_routes())
        // Session required
        .merge(auth_routes())
        .merge(bookmark_routes())
        .merge(notification_routes())
        .merge(skill_routes())
        .merge(project_routes())
        // Administrative roles
        .merge(admin_routes())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::session_middleware,
        ))
        .layer(
            ServiceBuilder::new()
                .layer(RequestBodyLimitLayer::new(state.config.api.max_request_size_bytes))
                .layer(cors_layer(&state.config.security)),
        );

    let router = if state.config.api.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    };

    router.with_state(state)
}

fn property_routes() -> Router<AppState> {
    use handlers::protected::properties as owned;
    use handlers::public::properties;

    Router::new()
        .route("/api/properties", get(properties::list).post(owned::create))
        .route("/api/properties/featured", get(properties::featured))
        .route("/api/properties/search", get(properties::search))
        .route("/api/properties/user/:user_id", get(properties::by_owner))
        .route(
            "/api/properties/:id",
            get(properties::show).put(owned::update).delete(owned::delete),
        )
}

fn auth_routes() -> Router<AppState> {
    use handlers::protected::auth;

    // Sign-in and callbacks belong to the identity provider.
    Router::new().route("/api/auth/session", get(auth::session))
}

fn bookmark_routes() -> Router<AppState> {
    use handlers::protected::bookmarks;

    Router::new()
        .route("/api/bookmarks", get(bookmarks::list).post(bookmarks::toggle))
        .route("/api/bookmarks/check", post(bookmarks::check))
}

fn notification_routes() -> Router<AppState> {
    use handlers::protected::notifications;

    Router::new()
        .route("/api/notifications", get(notifications::list))
        .route("/api/notifications/count", get(notifications::count))
        .route("/api/notifications/mark-as-read", post(notifications::mark_all))
        .route(
            "/api/notifications/:id",
            put(notifications::mark).delete(notifications::delete),
        )
}

fn skill_routes() -> Router<AppState> {
    use axum::routing::delete;
    use handlers::protected::{skills, user_skills};

    Router::new()
        .route("/api/skills", get(skills::list).post(skills::create))
        .route("/api/skills/:id", delete(skills::delete))
        .route("/api/user-skills", get(user_skills::list).post(user_skills::create))
        .route(
            "/api/user-skills/:id",
            put(user_skills::update).delete(user_skills::delete),
        )
}

fn project_routes() -> Router<AppState> {
    use axum::routing::delete;
    use handlers::protected::{allocations, projects};

    Router::new()
        .route("/api/projects", get(projects::list).post(projects::create))
        .route("/api/projects/:id", get(projects::show))
        .route("/api/allocations", get(allocations::list).post(allocations::create))
        .route("/api/allocations/:id", delete(allocations::delete))
}

fn admin_routes() -> Router<AppState> {
    use handlers::elevated::{settings, users};

    Router::new()
        .route("/api/settings", get(settings::show).put(settings::update))
        .route("/api/users", get(users::list))
        .route("/api/users/:id/role", put(users::set_role))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}
