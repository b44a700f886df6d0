//! Protected user-surface routes: profile, address, favorites, notifications.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Router;
use axum::routing::{get, put};

use greenbasket_core::NotificationId;

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::error::{AppError, Result};
use crate::extract::Json;
use crate::middleware::RequireAuth;
use crate::models::user::AddressUpdate;
use crate::response::ApiResponse;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/profile", get(profile))
        .route("/info", get(info))
        .route("/address", get(get_address).put(update_address))
        .route("/favorites", get(favorites))
        .route("/notifications", get(notifications))
        .route("/notifications/{id}/read", put(mark_notification_read))
}

async fn profile(
    State(state): State<AppState>,
    RequireAuth(user_id): RequireAuth,
) -> Result<impl IntoResponse> {
    let user = state.auth().current_user(&user_id)?;
    Ok(Json(ApiResponse::ok(user.profile())))
}

async fn info(
    State(state): State<AppState>,
    RequireAuth(user_id): RequireAuth,
) -> Result<impl IntoResponse> {
    let user = state.auth().current_user(&user_id)?;
    Ok(Json(ApiResponse::ok(user.info())))
}

async fn get_address(
    State(state): State<AppState>,
    RequireAuth(user_id): RequireAuth,
) -> Result<impl IntoResponse> {
    let user = state.auth().current_user(&user_id)?;
    Ok(Json(ApiResponse::ok(user.address)))
}

async fn update_address(
    State(state): State<AppState>,
    RequireAuth(user_id): RequireAuth,
    Json(body): Json<AddressUpdate>,
) -> Result<impl IntoResponse> {
    for (field, value) in [
        ("label", &body.label),
        ("addressLine1", &body.address_line1),
        ("city", &body.city),
        ("country", &body.country),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::BadRequest(format!("{field} is required")));
        }
    }

    let updated = UserRepository::new(state.storage())
        .update(&user_id, |user| {
            user.address.label = body.label;
            user.address.address_line1 = body.address_line1;
            user.address.address_line2 = body.address_line2;
            user.address.city = body.city;
            user.address.country = body.country;
            if let Some(coordinates) = body.coordinates {
                user.address.coordinates = coordinates;
            }
        })
        .map_err(map_user_not_found)?;
    Ok(Json(ApiResponse::ok_with_message(
        "Address updated",
        updated.address,
    )))
}

async fn favorites(
    State(state): State<AppState>,
    RequireAuth(user_id): RequireAuth,
) -> Result<impl IntoResponse> {
    let user = state.auth().current_user(&user_id)?;
    Ok(Json(ApiResponse::ok(user.favorites)))
}

async fn notifications(
    State(state): State<AppState>,
    RequireAuth(user_id): RequireAuth,
) -> Result<impl IntoResponse> {
    let user = state.auth().current_user(&user_id)?;
    let views: Vec<_> = user.notifications.iter().map(|n| n.view()).collect();
    Ok(Json(ApiResponse::list(views)))
}

async fn mark_notification_read(
    State(state): State<AppState>,
    RequireAuth(user_id): RequireAuth,
    Path(id): Path<NotificationId>,
) -> Result<impl IntoResponse> {
    let user = state.auth().current_user(&user_id)?;
    if !user.notifications.iter().any(|n| n.id == id) {
        return Err(AppError::NotFound("Notification not found".to_string()));
    }

    let updated = UserRepository::new(state.storage())
        .update(&user_id, |user| {
            if let Some(notification) = user.notifications.iter_mut().find(|n| n.id == id) {
                notification.read = true;
            }
        })
        .map_err(map_user_not_found)?;
    let view = updated
        .notifications
        .iter()
        .find(|n| n.id == id)
        .map(|n| n.view());
    Ok(Json(ApiResponse::ok_with_message(
        "Notification marked as read",
        view,
    )))
}

fn map_user_not_found(e: RepositoryError) -> AppError {
    match e {
        RepositoryError::NotFound => AppError::NotFound("User not found".to_string()),
        other => other.into(),
    }
}
