//! Cart routes.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Router;
use axum::routing::{get, post, put};
use serde::Deserialize;

use greenbasket_core::{CartItemId, ProductId};

use crate::error::Result;
use crate::extract::Json;
use crate::middleware::RequireAuth;
use crate::response::ApiResponse;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_cart).delete(clear_cart))
        .route("/add", post(add_item))
        .route("/items/{itemId}", put(update_item).delete(remove_item))
}

const fn default_quantity() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddItemRequest {
    product_id: ProductId,
    #[serde(default = "default_quantity")]
    quantity: u32,
}

#[derive(Debug, Deserialize)]
struct UpdateItemRequest {
    quantity: u32,
}

async fn get_cart(
    State(state): State<AppState>,
    RequireAuth(user_id): RequireAuth,
) -> Result<impl IntoResponse> {
    let cart = state.carts().get(&user_id)?;
    Ok(Json(ApiResponse::ok(cart)))
}

async fn add_item(
    State(state): State<AppState>,
    RequireAuth(user_id): RequireAuth,
    Json(body): Json<AddItemRequest>,
) -> Result<impl IntoResponse> {
    let cart = state
        .carts()
        .add_item(&user_id, &body.product_id, body.quantity)?;
    Ok(Json(ApiResponse::ok_with_message("Item added to cart", cart)))
}

async fn update_item(
    State(state): State<AppState>,
    RequireAuth(user_id): RequireAuth,
    Path(item_id): Path<CartItemId>,
    Json(body): Json<UpdateItemRequest>,
) -> Result<impl IntoResponse> {
    let cart = state
        .carts()
        .update_item(&user_id, &item_id, body.quantity)?;
    Ok(Json(ApiResponse::ok_with_message("Cart item updated", cart)))
}

async fn remove_item(
    State(state): State<AppState>,
    RequireAuth(user_id): RequireAuth,
    Path(item_id): Path<CartItemId>,
) -> Result<impl IntoResponse> {
    let cart = state.carts().remove_item(&user_id, &item_id)?;
    Ok(Json(ApiResponse::ok_with_message(
        "Item removed from cart",
        cart,
    )))
}

async fn clear_cart(
    State(state): State<AppState>,
    RequireAuth(user_id): RequireAuth,
) -> Result<impl IntoResponse> {
    let cart = state.carts().clear(&user_id)?;
    Ok(Json(ApiResponse::ok_with_message("Cart cleared", cart)))
}
