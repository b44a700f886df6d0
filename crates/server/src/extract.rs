//! Request extractors with envelope-shaped rejections.

use axum::extract::FromRequest;
use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::error::AppError;

/// JSON body extractor whose rejection renders the uniform response
/// envelope.
///
/// Axum's own `Json` rejects malformed or mistyped bodies with a plain-text
/// 422; routing that rejection through [`AppError`] keeps every response,
/// including parse failures, in the `{success, message, ...}` shape as a
/// 400.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}
