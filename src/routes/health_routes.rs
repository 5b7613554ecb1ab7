use axum::{Json, Router, routing::get};
use chrono::{DateTime, Utc};

use crate::models::AppState;

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub message: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        message: "Appointment API is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    })
}
