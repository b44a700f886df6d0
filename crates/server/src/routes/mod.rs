//! HTTP route definitions.
//!
//! | Prefix          | Module     | Auth      |
//! |-----------------|------------|-----------|
//! | `/api/auth`     | `auth`     | mixed     |
//! | `/api/user`     | `user`     | required  |
//! | `/api/products` | `products` | public    |
//! | `/api/stores`   | `stores`   | mixed     |
//! | `/api/offers`   | `offers`   | public    |
//! | `/api/brands`   | `brands`   | public    |
//! | `/api/cart`     | `cart`     | required  |
//! | `/api/orders`   | `orders`   | required  |

pub mod auth;
pub mod brands;
pub mod cart;
pub mod offers;
pub mod orders;
pub mod products;
pub mod stores;
pub mod user;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::middleware::rate_limit;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Assemble the application router without rate limits.
///
/// Tracing and CORS layers are applied by the binary; this router is what
/// the integration tests drive directly.
pub fn router() -> Router<AppState> {
    assemble(false)
}

/// Assemble the application router with per-IP rate limits: a strict limiter
/// on `/api/auth` and a relaxed one on the rest of `/api`.
pub fn rate_limited_router() -> Router<AppState> {
    assemble(true)
}

fn assemble(rate_limited: bool) -> Router<AppState> {
    let mut auth_routes = auth::router();
    if rate_limited {
        auth_routes = auth_routes.layer(rate_limit::auth_rate_limiter());
    }

    let mut api = Router::new()
        .nest("/auth", auth_routes)
        .nest("/user", user::router())
        .nest("/products", products::router())
        .nest("/stores", stores::router())
        .nest("/offers", offers::router())
        .nest("/brands", brands::router())
        .nest("/cart", cart::router())
        .nest("/orders", orders::router());
    if rate_limited {
        api = api.layer(rate_limit::api_rate_limiter());
    }

    Router::new()
        .route("/", get(welcome))
        .route("/health", get(health))
        .nest("/api", api)
        .fallback(not_found)
}

async fn welcome() -> impl IntoResponse {
    Json(ApiResponse::ok(json!({
        "name": "GreenBasket API",
        "version": env!("CARGO_PKG_VERSION"),
        "docs": "/health for liveness, /api/* for the API",
    })))
}

async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok(json!({"status": "ok"})))
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "message": "Route not found",
            "availableEndpoints": [
                "/api/auth", "/api/user", "/api/products", "/api/stores",
                "/api/offers", "/api/brands", "/api/cart", "/api/orders",
            ],
        })),
    )
}
