//! Application error type and its HTTP mapping.

use std::sync::atomic::{AtomicBool, Ordering};

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::response::ApiResponse;
use crate::services::{AuthError, CartError, OrderError};

/// Convenience alias for handler results.
pub type Result<T> = std::result::Result<T, AppError>;

static EXPOSE_INTERNAL_ERRORS: AtomicBool = AtomicBool::new(false);

/// Control whether 500 responses carry internal error detail in the
/// envelope's `error` field. Off by default; enabled in development.
pub fn set_expose_internal_errors(expose: bool) {
    EXPOSE_INTERNAL_ERRORS.store(expose, Ordering::Relaxed);
}

/// Top-level application error returned by route handlers.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// The status code and client-facing message for this error.
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Self::Auth(err) => match err {
                AuthError::MissingToken => {
                    (StatusCode::UNAUTHORIZED, "Access token required".to_string())
                }
                AuthError::InvalidToken | AuthError::TokenExpired => (
                    StatusCode::FORBIDDEN,
                    "Invalid or expired token".to_string(),
                ),
                AuthError::InvalidCredentials => {
                    (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string())
                }
                AuthError::UserNotFound => (StatusCode::NOT_FOUND, "User not found".to_string()),
                AuthError::UserAlreadyExists => (
                    StatusCode::CONFLICT,
                    "User with this email already exists".to_string(),
                ),
                AuthError::InvalidEmail(e) => (StatusCode::BAD_REQUEST, e.to_string()),
                AuthError::WeakPassword(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                AuthError::PasswordHash | AuthError::TokenEncoding | AuthError::Repository(_) => {
                    internal(err)
                }
            },
            Self::Cart(err) => match err {
                CartError::ProductNotFound => {
                    (StatusCode::NOT_FOUND, "Product not found".to_string())
                }
                CartError::OutOfStock => (
                    StatusCode::BAD_REQUEST,
                    "Product is out of stock".to_string(),
                ),
                CartError::InvalidQuantity => (
                    StatusCode::BAD_REQUEST,
                    "Quantity must be at least 1".to_string(),
                ),
                CartError::CartNotFound => (StatusCode::NOT_FOUND, "Cart not found".to_string()),
                CartError::ItemNotFound => {
                    (StatusCode::NOT_FOUND, "Cart item not found".to_string())
                }
                CartError::Repository(_) => internal(err),
            },
            Self::Order(err) => match err {
                OrderError::EmptyCart => (StatusCode::BAD_REQUEST, "Cart is empty".to_string()),
                OrderError::NotFound => (StatusCode::NOT_FOUND, "Order not found".to_string()),
                OrderError::InvalidTransition { from, to } => (
                    StatusCode::BAD_REQUEST,
                    format!("Cannot change order status from {from} to {to}"),
                ),
                OrderError::CannotCancel => (
                    StatusCode::BAD_REQUEST,
                    "Cannot cancel this order".to_string(),
                ),
                OrderError::Repository(_) => internal(err),
            },
            Self::Repository(err) => internal(err),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::Internal(_) => internal(self),
        }
    }
}

fn internal(err: &dyn std::fmt::Display) -> (StatusCode, String) {
    tracing::error!(error = %err, "internal error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        let detail = (status == StatusCode::INTERNAL_SERVER_ERROR
            && EXPOSE_INTERNAL_ERRORS.load(Ordering::Relaxed))
        .then(|| self.to_string());

        (status, Json(ApiResponse::failure(message, detail))).into_response()
    }
}
