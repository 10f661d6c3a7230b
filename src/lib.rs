pub mod api;
pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

/// Build the full router: public user and health routes, plus the
/// JWT-protected resource routes
pub fn app(state: AppState) -> Router {
    let protected = Router::new()
        .merge(user_routes())
        .merge(photo_routes())
        .merge(comment_routes())
        .merge(social_routes())
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_middleware));

    let mut router = Router::new()
        // Public
        .route("/", get(handlers::public::health::root))
        .route("/health", get(handlers::public::health::health))
        .route("/users/register", post(handlers::public::users::register))
        .route("/users/login", post(handlers::public::users::login))
        // Protected
        .merge(protected)
        .layer(cors_layer(&state.config.security.cors_origins));

    if state.config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn user_routes() -> Router<AppState> {
    use handlers::protected::users;

    Router::new().route(
        "/users",
        get(users::list).put(users::update).delete(users::delete),
    )
}

fn photo_routes() -> Router<AppState> {
    use handlers::protected::photos;

    Router::new()
        .route("/photos", get(photos::list).post(photos::create))
        .route("/photos/:id", put(photos::update).delete(photos::delete))
}

fn comment_routes() -> Router<AppState> {
    use handlers::protected::comments;

    Router::new()
        .route("/comments", get(comments::list).post(comments::create))
        .route("/comments/:id", put(comments::update).delete(comments::delete))
}

fn social_routes() -> Router<AppState> {
    use handlers::protected::socials;

    Router::new()
        .route("/socials", get(socials::list).post(socials::create))
        .route("/socials/:id", put(socials::update).delete(socials::delete))
}

/// `*` (or an empty list) allows any origin; otherwise only the listed ones
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods(Any)
        .allow_headers(Any)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::database::InMemoryStore;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_app() -> Router {
        let state = AppState::new(
            Arc::new(InMemoryStore::new()),
            AppConfig::in_memory("unit-test-secret"),
        )
        .unwrap();
        app(state)
    }

    #[test]
    fn cors_layer_tolerates_bad_origins() {
        let _ = cors_layer(&["*".to_string()]);
        let _ = cors_layer(&[]);
        let _ = cors_layer(&["http://localhost:3000".to_string(), "not a\nheader".to_string()]);
    }

    #[tokio::test]
    async fn health_is_public() {
        let response = test_app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn resource_routes_require_a_token() {
        for uri in ["/photos", "/comments", "/socials", "/users"] {
            let response = test_app()
                .oneshot(Request::get(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
        }
    }

    #[tokio::test]
    async fn auth_runs_before_path_parsing() {
        let response = test_app()
            .oneshot(
                Request::put("/photos/not-a-number")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
