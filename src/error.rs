use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::models::AppointmentStatus;

/* -------------------------
   Domain errors
--------------------------*/

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictSummary {
    pub id: String,
    pub patient_name: String,
    pub time: String,
    pub duration: u32,
}

/// Failures returned by the appointment store. None of them leave a partial write behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppointmentError {
    #[error("Invalid appointment data")]
    InvalidData { errors: Vec<String> },

    #[error("Invalid status value: {value}")]
    InvalidStatus { value: String },

    #[error("Time conflict detected for {doctor_name} on {date}")]
    Conflict {
        doctor_name: String,
        date: String,
        conflicting: Vec<ConflictSummary>,
        requested_time: String,
        requested_duration: u32,
    },

    #[error("Appointment with ID {0} not found")]
    NotFound(String),
}

/* -------------------------
   HTTP envelope
--------------------------*/

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorObject,
}

#[derive(Debug, Serialize)]
pub struct ErrorObject {
    pub code: String,
    pub message: String,
    pub details: Value,
}

#[derive(Debug)]
pub enum ApiError {
    Validation(String, Value),
    Conflict(String, Value),
    NotFound(String, Value),
    Internal(String),
}

impl ApiError {
    pub fn body_required() -> Self {
        ApiError::Validation("Request body is required".into(), json!({}))
    }

    pub fn status_required() -> Self {
        ApiError::Validation("Status is required".into(), json!({}))
    }

    fn to_error_response(code: &str, message: &str, details: Value) -> Json<ErrorResponse> {
        Json(ErrorResponse {
            success: false,
            error: ErrorObject {
                code: code.to_string(),
                message: message.to_string(),
                details,
            },
        })
    }
}

impl From<AppointmentError> for ApiError {
    fn from(err: AppointmentError) -> Self {
        let message = err.to_string();
        match err {
            AppointmentError::InvalidData { errors } => {
                ApiError::Validation(message, json!({ "validation_errors": errors }))
            }
            AppointmentError::InvalidStatus { .. } => ApiError::Validation(
                message,
                json!({ "valid_statuses": AppointmentStatus::names() }),
            ),
            AppointmentError::Conflict {
                conflicting,
                requested_time,
                requested_duration,
                ..
            } => ApiError::Conflict(
                message,
                json!({
                    "conflicting_appointments": conflicting,
                    "requested_time": requested_time,
                    "requested_duration": requested_duration,
                }),
            ),
            AppointmentError::NotFound(id) => {
                ApiError::NotFound(message, json!({ "appointment_id": id }))
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(msg, details) => (
                StatusCode::BAD_REQUEST,
                ApiError::to_error_response("VALIDATION_ERROR", &msg, details),
            )
                .into_response(),
            ApiError::Conflict(msg, details) => (
                StatusCode::CONFLICT,
                ApiError::to_error_response("CONFLICT_ERROR", &msg, details),
            )
                .into_response(),
            ApiError::NotFound(msg, details) => (
                StatusCode::NOT_FOUND,
                ApiError::to_error_response("NOT_FOUND", &msg, details),
            )
                .into_response(),
            ApiError::Internal(msg) => {
                tracing::error!("server error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::to_error_response("SERVER_ERROR", &msg, json!({})),
                )
                    .into_response()
            }
        }
    }
}
