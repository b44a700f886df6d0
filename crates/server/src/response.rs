//! Uniform JSON response envelope.
//!
//! Every endpoint responds with the same shape the mobile client expects:
//! `{success, message?, data?, count?, error?}`.

use serde::Serialize;

/// The uniform response envelope.
///
/// `count` reports the pre-pagination total for list endpoints. `error`
/// carries internal detail and is only populated outside production.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Successful response carrying `data`.
    #[must_use]
    pub const fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            count: None,
            error: None,
        }
    }

    /// Successful response with a human-readable message.
    #[must_use]
    pub fn ok_with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
            count: None,
            error: None,
        }
    }

    /// Attach a count (list endpoints).
    #[must_use]
    pub const fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    /// Successful list response; `count` defaults to the list length.
    #[must_use]
    pub fn list(data: Vec<T>) -> Self {
        let count = data.len();
        Self::ok(data).with_count(count)
    }
}

impl ApiResponse<()> {
    /// Failure envelope with a message and optional internal detail.
    #[must_use]
    pub fn failure(message: impl Into<String>, error: Option<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
            count: None,
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_envelope_omits_empty_fields() {
        let json = serde_json::to_value(ApiResponse::ok(42)).expect("serialize");
        assert_eq!(json, serde_json::json!({"success": true, "data": 42}));
    }

    #[test]
    fn test_list_envelope_counts() {
        let json = serde_json::to_value(ApiResponse::list(vec!["a", "b"])).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({"success": true, "data": ["a", "b"], "count": 2})
        );
    }

    #[test]
    fn test_failure_envelope() {
        let json = serde_json::to_value(ApiResponse::failure("Cart is empty", None))
            .expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({"success": false, "message": "Cart is empty"})
        );
    }
}
