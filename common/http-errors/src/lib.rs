use axum::{http::{StatusCode, HeaderValue}, response::{IntoResponse, Response}, Json};
use serde::Serialize;
use uuid::Uuid;

/// JSON envelope shared by every admin endpoint error.
#[derive(Serialize, Debug)]
pub struct ErrorBody {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")] pub missing_capability: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")] pub trace_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")] pub message: Option<String>,
}

#[derive(Debug)]
pub enum ApiError {
    Unauthorized { trace_id: Option<Uuid> },
    ForbiddenMissingCapability { capability: &'static str, trace_id: Option<Uuid> },
    BadRequest { code: &'static str, trace_id: Option<Uuid>, message: Option<String> },
    Internal { trace_id: Option<Uuid>, message: Option<String> },
}

impl ApiError {
    pub fn internal<E: std::fmt::Display>(e: E, trace_id: Option<Uuid>) -> Self { Self::Internal { trace_id, message: Some(e.to_string()) } }

    /// Value emitted in the `X-Error-Code` header and the body `code` field.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Unauthorized { .. } => "unauthenticated",
            ApiError::ForbiddenMissingCapability { .. } => "missing_capability",
            ApiError::BadRequest { code, .. } => code,
            ApiError::Internal { .. } => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_code = self.code();
        let (status, body) = match self {
            ApiError::Unauthorized { trace_id } => (
                StatusCode::UNAUTHORIZED,
                ErrorBody { code: error_code.into(), missing_capability: None, trace_id, message: None },
            ),
            ApiError::ForbiddenMissingCapability { capability, trace_id } => (
                StatusCode::FORBIDDEN,
                ErrorBody { code: error_code.into(), missing_capability: Some(capability.into()), trace_id, message: None },
            ),
            ApiError::BadRequest { trace_id, message, .. } => (
                StatusCode::BAD_REQUEST,
                ErrorBody { code: error_code.into(), missing_capability: None, trace_id, message },
            ),
            ApiError::Internal { trace_id, message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody { code: error_code.into(), missing_capability: None, trace_id, message },
            ),
        };
        let mut resp = (status, Json(body)).into_response();
        if let Ok(val) = HeaderValue::from_str(error_code) {
            resp.headers_mut().insert("X-Error-Code", val);
        }
        resp
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
