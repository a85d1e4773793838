//! HTTP surface - axum router, shared state, and request handlers.
//!
//! Everything lives under `/api` except the `/health` check. Handlers are thin: they pull
//! inputs out of the request, call into [`crate::core`], and let [`crate::errors::Error`]
//! turn failures into `{ "message": ... }` responses.

pub mod auth;
pub mod brands;
pub mod error;
pub mod extract;
pub mod orders;
pub mod products;
pub mod users;

use crate::core::auth::Authenticator;
use axum::{
    Json, Router,
    http::{
        Method, StatusCode,
        header::{AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
    routing::{get, post},
};
use sea_orm::DatabaseConnection;
use serde_json::json;
use std::{any::Any, sync::Arc, time::Duration};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

/// State shared by every handler.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Connection pool
    pub db: DatabaseConnection,
    /// Token signing and password hashing
    pub auth: Arc<Authenticator>,
}

impl AppState {
    /// Creates handler state from a pool and an authenticator.
    #[must_use]
    pub fn new(db: DatabaseConnection, auth: Authenticator) -> Self {
        Self {
            db,
            auth: Arc::new(auth),
        }
    }
}

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION, CACHE_CONTROL])
        .max_age(Duration::from_secs(60 * 60));

    let api = Router::new()
        .route("/products", get(products::list).post(products::create))
        .route(
            "/products/:id",
            get(products::get)
                .put(products::update)
                .delete(products::delete),
        )
        .route("/brands", get(brands::list).post(brands::create))
        .route("/brands/:id", get(brands::get))
        .route("/orders", get(orders::list).post(orders::create))
        .route("/orders/:id", get(orders::get).put(orders::update_status))
        .route("/orders/user/:user_id", get(orders::for_user))
        .route("/users", get(users::list))
        .route("/users/me", get(users::me))
        .route(
            "/users/:id",
            get(users::get).put(users::update).delete(users::delete),
        )
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy" }))
}

#[allow(clippy::needless_pass_by_value)]
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!("Handler panicked: {detail}");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "message": "Internal server error" })),
    )
        .into_response()
}
