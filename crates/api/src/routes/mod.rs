//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /                                  - Banner
//! GET    /health                            - Liveness
//! GET    /health/ready                      - Readiness (database)
//!
//! # Auth (rate limited)
//! POST   /api/auth/register                 - Create BUYER account, returns token
//! POST   /api/auth/login                    - Password login, returns token
//!
//! # Stores
//! POST   /api/stores/apply                  - BUYER applies for a store
//! GET    /api/stores/me                     - STORE views own store
//!
//! # Admin (ADMIN only)
//! GET    /api/admin/stores/pending          - Stores awaiting approval
//! PUT    /api/admin/stores/approve/{storeId} - Approve a store
//! GET    /api/admin/users                   - All users
//!
//! # Products
//! GET    /api/products                      - Public catalog
//! GET    /api/products/{id}                 - Public product detail
//! POST   /api/products                      - STORE lists a product
//! PUT    /api/products/{id}                 - STORE updates own product
//! DELETE /api/products/{id}                 - STORE deletes own product
//! ```

pub mod admin;
pub mod auth;
pub mod products;
pub mod stores;

use axum::{
    Router,
    extract::{FromRequest, FromRequestParts, State},
    http::{HeaderName, HeaderValue, Method, StatusCode, header},
    middleware::from_fn,
    routing::{get, post, put},
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::error::AppError;
use crate::middleware::{
    auth_rate_limiter, request_id::REQUEST_ID_HEADER, request_id_middleware,
    security_headers_middleware,
};
use crate::state::AppState;

/// JSON body extractor whose rejections use the API's `{"msg"}` error body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

/// Path extractor whose rejections use the API's `{"msg"}` error body.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct PathParam<T>(pub T);

/// Create the auth routes router.
pub fn auth_routes(rate_limited: bool) -> Router<AppState> {
    let router = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    if rate_limited {
        router.layer(auth_rate_limiter())
    } else {
        router
    }
}

/// Create the store routes router.
pub fn store_routes() -> Router<AppState> {
    Router::new()
        .route("/apply", post(stores::apply))
        .route("/me", get(stores::me))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/stores/pending", get(admin::pending_stores))
        .route("/stores/approve/{store_id}", put(admin::approve_store))
        .route("/users", get(admin::users))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::destroy),
        )
}

/// Create all API routes.
pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(banner))
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/api/auth", auth_routes(state.config().auth_rate_limit))
        .nest("/api/stores", store_routes())
        .nest("/api/admin", admin_routes())
        .nest("/api/products", product_routes())
}

/// Build the CORS layer from the configured origins.
///
/// An empty list allows any origin. Bearer tokens travel in a header, not
/// cookies, so credentials are never allowed.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)]);

    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            HeaderValue::from_str(origin)
                .inspect_err(|_| tracing::warn!(%origin, "Ignoring invalid CORS origin"))
                .ok()
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(allowed))
}

/// Build the complete application: routes, middleware and state.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config().cors_allowed_origins);

    routes(&state)
        .layer(cors)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        user_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Banner for the root path.
async fn banner() -> &'static str {
    "Corner Store API is running..."
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
