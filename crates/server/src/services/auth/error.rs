//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] greenbasket_core::EmailError),

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Invalid credentials (unknown email or wrong password).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// User record no longer exists.
    #[error("user not found")]
    UserNotFound,

    /// Email already registered.
    #[error("user already exists")]
    UserAlreadyExists,

    /// No bearer token on a protected request.
    #[error("access token required")]
    MissingToken,

    /// Token failed signature or structural checks.
    #[error("invalid token")]
    InvalidToken,

    /// Token signature verified but the expiry has passed.
    #[error("token expired")]
    TokenExpired,

    /// Password hashing or verification failed internally.
    #[error("password hashing error")]
    PasswordHash,

    /// Token claims could not be encoded.
    #[error("token encoding error")]
    TokenEncoding,

    /// Storage error.
    #[error("storage error: {0}")]
    Repository(#[from] RepositoryError),
}
