//! JSON response envelopes.
//!
//! Every API response is either `{"success": true, "data": ...}` or
//! `{"success": false, "error": {"message": ..., "code": ...}}`.

use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

/// 200 envelope around `data`.
pub fn success<T: Serialize>(data: T) -> Response {
    (
        StatusCode::OK,
        Json(ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }),
    )
        .into_response()
}

/// 201 envelope around `data`.
pub fn created<T: Serialize>(data: T) -> Response {
    (
        StatusCode::CREATED,
        Json(ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }),
    )
        .into_response()
}

/// Error envelope with a stable message and code.
pub fn error(status: StatusCode, message: impl Into<String>, code: &'static str) -> Response {
    (
        status,
        Json(ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(ErrorBody {
                message: message.into(),
                code: Some(code),
            }),
        }),
    )
        .into_response()
}
