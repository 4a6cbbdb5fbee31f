use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use service::errors::ValidationErrors;

/// Failure half of the response envelope: `{message, status: false, error?}`.
/// `error` is an HTTP-like integer code, or a field→violations map for
/// validation failures, or absent (empty patch body).
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    detail: Option<ErrorDetail>,
}

#[derive(Debug)]
enum ErrorDetail {
    Code(u16),
    Fields(ValidationErrors),
}

impl ApiError {
    pub fn not_found(message: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.to_string(),
            detail: Some(ErrorDetail::Code(404)),
        }
    }

    pub fn validation(errors: ValidationErrors) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: "validation failed".to_string(),
            detail: Some(ErrorDetail::Fields(errors)),
        }
    }

    pub fn empty_update() -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: "no data supplied".to_string(),
            detail: None,
        }
    }

    pub fn storage(message: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.to_string(),
            detail: Some(ErrorDetail::Code(500)),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = json!({ "message": self.message, "status": false });
        match self.detail {
            Some(ErrorDetail::Code(code)) => body["error"] = json!(code),
            Some(ErrorDetail::Fields(fields)) => body["error"] = json!(fields),
            None => {}
        }
        (self.status, Json(body)).into_response()
    }
}
