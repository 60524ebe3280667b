// ============================================================================
// Resto API - Router
// File: crates/resto-api/src/router.rs
// ============================================================================

use std::time::Duration;

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method, StatusCode,
    },
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Json, Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{warn, Level};

use crate::handlers::{admin, admins, auth, branches, health, menus, orders, public, registration, restaurants};
use crate::middleware::{rate_limit, require_auth};
use crate::response::ApiResponse;
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let limiters = state.limiters.clone();

    // Public routes (no session)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/api/v1/auth/logout", post(auth::logout))
        .route("/api/v1/auth/password-reset/confirm", post(auth::confirm_password_reset))
        .route("/api/v1/plans", get(registration::plans))
        .route("/api/v1/registrations/{id}", get(registration::get))
        .route("/api/v1/public/{slug}/menu", get(public::menu));

    let login_routes = Router::new()
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/password-reset/request", post(auth::request_password_reset))
        .route_layer(from_fn_with_state(limiters.login, rate_limit));

    let registration_routes = Router::new()
        .route("/api/v1/registrations", post(registration::start))
        .route("/api/v1/registrations/{id}/payment", post(registration::pay))
        .route_layer(from_fn_with_state(limiters.registration, rate_limit));

    let order_routes = Router::new()
        .route("/api/v1/public/{slug}/orders", post(public::place_order))
        .route_layer(from_fn_with_state(limiters.public_orders, rate_limit));

    // Session-protected routes
    let protected_routes = Router::new()
        .route("/api/v1/auth/me", get(auth::me))
        .route("/api/v1/auth/logout-all", post(auth::logout_all))
        .route("/api/v1/auth/change-password", post(auth::change_password))
        // Restaurant
        .route("/api/v1/restaurants/{rid}", get(restaurants::get).put(restaurants::update))
        .route("/api/v1/restaurants/{rid}/dashboard", get(restaurants::dashboard))
        .route("/api/v1/restaurants/{rid}/admins", get(admins::list).post(admins::create))
        .route("/api/v1/admins/{uid}/active", put(admins::set_active))
        // Branches
        .route("/api/v1/restaurants/{rid}/branches", get(branches::list).post(branches::create))
        .route(
            "/api/v1/branches/{bid}",
            get(branches::get).put(branches::update).delete(branches::delete),
        )
        .route("/api/v1/branches/{bid}/main", post(branches::set_main))
        // Menus
        .route("/api/v1/branches/{bid}/menus", get(menus::list_menus).post(menus::create_menu))
        .route(
            "/api/v1/menus/{mid}",
            get(menus::get_menu).put(menus::update_menu).delete(menus::delete_menu),
        )
        .route("/api/v1/menus/{mid}/active", put(menus::set_menu_active))
        .route(
            "/api/v1/menus/{mid}/theme",
            get(menus::get_theme).put(menus::update_theme).delete(menus::reset_theme),
        )
        // Categories
        .route(
            "/api/v1/menus/{mid}/categories",
            get(menus::list_categories).post(menus::create_category),
        )
        .route("/api/v1/menus/{mid}/categories/order", put(menus::reorder_categories))
        .route(
            "/api/v1/categories/{cid}",
            put(menus::update_category).delete(menus::delete_category),
        )
        // Items
        .route("/api/v1/categories/{cid}/items", get(menus::list_items).post(menus::create_item))
        .route("/api/v1/categories/{cid}/items/order", put(menus::reorder_items))
        .route("/api/v1/items/{iid}", put(menus::update_item).delete(menus::delete_item))
        .route("/api/v1/items/{iid}/availability", put(menus::set_item_availability))
        // Orders
        .route("/api/v1/restaurants/{rid}/orders", get(orders::list))
        .route("/api/v1/restaurants/{rid}/orders/stats", get(orders::stats))
        .route("/api/v1/orders/{oid}", get(orders::get))
        .route("/api/v1/orders/{oid}/status", put(orders::update_status))
        // Root admin
        .route("/api/v1/admin/restaurants", get(admin::list_restaurants))
        .route("/api/v1/admin/stats", get(admin::stats))
        .route("/api/v1/admin/restaurants/{rid}/active", put(admin::set_restaurant_active))
        .route("/api/v1/admin/restaurants/{rid}/plan", put(admin::change_plan))
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    let timeout = Duration::from_secs(state.config.app.request_timeout_seconds.max(1));
    let cors = cors_layer(&state.config.cors.allowed_origins);

    Router::new()
        .merge(public_routes)
        .merge(login_routes)
        .merge(registration_routes)
        .merge(order_routes)
        .merge(protected_routes)
        .fallback(not_found)
        .with_state(state)
        .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

/// Credentialed CORS for the configured front-end origins
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
}

async fn not_found() -> (StatusCode, Json<ApiResponse<()>>) {
    (StatusCode::NOT_FOUND, Json(ApiResponse::error("NOT_FOUND", "Route not found")))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{header::AUTHORIZATION, Request},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::test_support::{test_config, test_state};

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_is_public() {
        let app = create_router(test_state(test_config()));
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn plans_are_listed_without_login() {
        let app = create_router(test_state(test_config()));
        let response = app
            .oneshot(Request::builder().uri("/api/v1/plans").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"].as_array().map(Vec::len), Some(3));
    }

    #[tokio::test]
    async fn protected_route_requires_session() {
        let app = create_router(test_state(test_config()));
        let response = app
            .oneshot(Request::builder().uri("/api/v1/auth/me").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn non_bearer_authorization_is_rejected() {
        let app = create_router(test_state(test_config()));
        let request = Request::builder()
            .uri("/api/v1/admin/stats")
            .header(AUTHORIZATION, "Basic dXNlcjpwYXNz")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn malformed_path_id_is_bad_request() {
        let app = create_router(test_state(test_config()));
        let response = app
            .oneshot(Request::builder().uri("/api/v1/registrations/not-a-uuid").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn login_is_rate_limited_per_client() {
        let mut config = test_config();
        config.rate_limit.login_per_minute = 1;
        let app = create_router(test_state(config));

        // An empty username is rejected before any database access
        let login = || {
            Request::builder()
                .method(Method::POST)
                .uri("/api/v1/auth/login")
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"username":"","password":"x"}"#))
                .unwrap()
        };

        let first = app.clone().oneshot(login()).await.unwrap();
        assert_eq!(first.status(), StatusCode::BAD_REQUEST);

        let second = app.oneshot(login()).await.unwrap();
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
        let body = body_json(second).await;
        assert_eq!(body["error"]["code"], "RATE_LIMITED");
    }

    #[tokio::test]
    async fn registration_quota_is_separate_from_login() {
        let mut config = test_config();
        config.rate_limit.login_per_minute = 1;
        config.rate_limit.registration_per_minute = 2;
        let app = create_router(test_state(config));

        let post = |uri: &str, body: &'static str| {
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap()
        };
        let login = || post("/api/v1/auth/login", r#"{"username":"","password":"x"}"#);
        let register = || post("/api/v1/registrations", "{}");

        app.clone().oneshot(login()).await.unwrap();
        let blocked = app.clone().oneshot(login()).await.unwrap();
        assert_eq!(blocked.status(), StatusCode::TOO_MANY_REQUESTS);

        for _ in 0..2 {
            let response = app.clone().oneshot(register()).await.unwrap();
            assert_ne!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        }
        let third = app.oneshot(register()).await.unwrap();
        assert_eq!(third.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn unknown_route_uses_envelope() {
        let app = create_router(test_state(test_config()));
        let response = app
            .oneshot(Request::builder().uri("/api/v1/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"]["code"], "NOT_FOUND");
    }
}
