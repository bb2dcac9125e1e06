//! Response types for the payroll engine API.
//!
//! Every endpoint, success or failure, answers with the same envelope:
//! `{success, message, data?, errors?}`. This module defines that envelope
//! and the mapping from [`EngineError`] to HTTP status codes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::error::EngineError;

/// The uniform response envelope.
///
/// `data` carries the payload on success; `errors` carries machine-readable
/// error details on failure. Both are omitted from the JSON when absent.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request succeeded.
    pub success: bool,
    /// A human-readable summary of the outcome.
    pub message: String,
    /// The payload, present on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error details, present on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Value>,
}

impl<T: Serialize> ApiResponse<T> {
    /// A successful envelope with a payload.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            errors: None,
        }
    }
}

impl ApiResponse<Value> {
    /// A successful envelope with no payload.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
            errors: None,
        }
    }

    /// A failed envelope.
    pub fn error(message: impl Into<String>, errors: Value) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            errors: Some(errors),
        }
    }
}

/// An error envelope paired with its HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional field-level error details.
    pub errors: Option<Value>,
}

impl ApiErrorResponse {
    /// Creates an error response.
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
            errors: None,
        }
    }

    /// Creates a 400 validation error with field-level details.
    pub fn validation(message: impl Into<String>, errors: Value) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "VALIDATION_ERROR".to_string(),
            message: message.into(),
            errors: Some(errors),
        }
    }

    /// Creates a 400 malformed body error.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "MALFORMED_JSON", message)
    }

    /// Creates a 401 unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message)
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        let mut errors = json!({ "code": self.code });
        if let Some(Value::Object(details)) = self.errors {
            if let Some(obj) = errors.as_object_mut() {
                obj.extend(details);
            }
        }
        let body = ApiResponse::error(self.message, errors);
        (self.status, Json(body)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        let (status, code) = match &error {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR")
            }
            EngineError::TemplateNotFound { .. } => (StatusCode::BAD_REQUEST, "TEMPLATE_NOT_FOUND"),
            EngineError::InvalidPeriod { .. } => (StatusCode::BAD_REQUEST, "INVALID_PERIOD"),
            EngineError::MissingAttendance { .. } => {
                (StatusCode::BAD_REQUEST, "MISSING_ATTENDANCE")
            }
            EngineError::CycleNotFound { .. } => (StatusCode::NOT_FOUND, "CYCLE_NOT_FOUND"),
            EngineError::RecordNotFound { .. } => (StatusCode::NOT_FOUND, "RECORD_NOT_FOUND"),
            EngineError::AdjustmentNotFound { .. } => {
                (StatusCode::NOT_FOUND, "ADJUSTMENT_NOT_FOUND")
            }
            EngineError::InvalidStatusTransition { .. } => {
                (StatusCode::CONFLICT, "INVALID_STATUS_TRANSITION")
            }
            EngineError::GenerationInProgress { .. } => {
                (StatusCode::CONFLICT, "GENERATION_IN_PROGRESS")
            }
            EngineError::CycleLocked { .. } => (StatusCode::CONFLICT, "CYCLE_LOCKED"),
            EngineError::InvalidAdjustment { .. } => {
                (StatusCode::BAD_REQUEST, "INVALID_ADJUSTMENT")
            }
            EngineError::PaymentExceedsNet { .. } => {
                (StatusCode::BAD_REQUEST, "PAYMENT_EXCEEDS_NET")
            }
            EngineError::ValidationError { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        };
        Self::new(status, code, message)
    }
}
