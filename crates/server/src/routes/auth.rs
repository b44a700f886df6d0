//! Authentication routes: login, registration, current user.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Router, routing::get, routing::post};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::extract::Json;
use crate::middleware::RequireAuth;
use crate::models::PublicUser;
use crate::response::ApiResponse;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/me", get(me))
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct RegisterRequest {
    name: String,
    email: String,
    password: String,
    #[serde(default)]
    phone: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AuthPayload {
    token: String,
    user: PublicUser,
}

async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let (token, user) = state.auth().login(&body.email, &body.password)?;
    Ok(Json(ApiResponse::ok_with_message(
        "Login successful",
        AuthPayload { token, user },
    )))
}

async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    let (token, user) = state.auth().register(
        &body.name,
        &body.email,
        &body.password,
        body.phone.as_deref(),
    )?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_message(
            "Registration successful",
            AuthPayload { token, user },
        )),
    ))
}

async fn me(
    State(state): State<AppState>,
    RequireAuth(user_id): RequireAuth,
) -> Result<impl IntoResponse> {
    let user = state.auth().current_user(&user_id)?;
    Ok(Json(ApiResponse::ok(user.public())))
}
