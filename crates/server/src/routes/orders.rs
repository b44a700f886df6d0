//! Order routes: listing, checkout, lifecycle updates.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Router;
use axum::routing::{get, put};
use serde::Deserialize;

use greenbasket_core::{OrderId, OrderStatus};

use crate::error::Result;
use crate::extract::Json;
use crate::middleware::RequireAuth;
use crate::models::user::Address;
use crate::response::ApiResponse;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route("/{id}", get(get_order))
        .route("/{id}/status", put(update_status))
        .route("/{id}/cancel", put(cancel_order))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateOrderRequest {
    #[serde(default)]
    delivery_address: Option<Address>,
    #[serde(default)]
    payment_method: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpdateStatusRequest {
    status: OrderStatus,
}

async fn list_orders(
    State(state): State<AppState>,
    RequireAuth(user_id): RequireAuth,
) -> Result<impl IntoResponse> {
    let orders = state.orders().list(&user_id)?;
    Ok(Json(ApiResponse::list(orders)))
}

async fn get_order(
    State(state): State<AppState>,
    RequireAuth(user_id): RequireAuth,
    Path(id): Path<OrderId>,
) -> Result<impl IntoResponse> {
    let order = state.orders().get(&id, &user_id)?;
    Ok(Json(ApiResponse::ok(order)))
}

async fn create_order(
    State(state): State<AppState>,
    RequireAuth(user_id): RequireAuth,
    Json(body): Json<CreateOrderRequest>,
) -> Result<impl IntoResponse> {
    let order = state
        .orders()
        .checkout(&user_id, body.delivery_address, body.payment_method)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_message("Order placed successfully", order)),
    ))
}

async fn update_status(
    State(state): State<AppState>,
    RequireAuth(user_id): RequireAuth,
    Path(id): Path<OrderId>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse> {
    let order = state.orders().update_status(&id, &user_id, body.status)?;
    Ok(Json(ApiResponse::ok_with_message("Order status updated", order)))
}

async fn cancel_order(
    State(state): State<AppState>,
    RequireAuth(user_id): RequireAuth,
    Path(id): Path<OrderId>,
) -> Result<impl IntoResponse> {
    let order = state.orders().cancel(&id, &user_id)?;
    Ok(Json(ApiResponse::ok_with_message("Order cancelled", order)))
}
