// src/routes/appointment_routes.rs

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde_json::{json, Value};

use crate::{
    error::ApiError,
    models::{ApiOk, AppState, Appointment, DeleteData, DeleteResponse, ListFilters},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/appointments", get(list_appointments).post(create_appointment))
        .route(
            "/appointments/{appointment_id}",
            get(get_appointment).delete(delete_appointment),
        )
        .route("/appointments/{appointment_id}/status", put(update_appointment_status))
}

/* ============================================================
   GET /appointments
   ============================================================ */

pub async fn list_appointments(
    State(state): State<AppState>,
    query: Result<Query<ListFilters>, QueryRejection>,
) -> Result<Json<ApiOk<Vec<Appointment>>>, ApiError> {
    let Query(filters) = query.map_err(|rejection| {
        ApiError::Validation(format!("Invalid filters: {}", rejection.body_text()), json!({}))
    })?;
    let store = state.store.read().await;
    let appointments = store.list(&filters);
    tracing::debug!("listed {} appointment(s) with {:?}", appointments.len(), filters);
    Ok(Json(ApiOk::new(appointments)))
}

/* ============================================================
   GET /appointments/{id}
   ============================================================ */

pub async fn get_appointment(
    State(state): State<AppState>,
    Path(appointment_id): Path<String>,
) -> Result<Json<ApiOk<Appointment>>, ApiError> {
    let store = state.store.read().await;
    let appointment = store.get_by_id(&appointment_id)?;
    Ok(Json(ApiOk::new(appointment)))
}

/* ============================================================
   POST /appointments (create)
   ============================================================ */

pub async fn create_appointment(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiOk<Appointment>>), ApiError> {
    let payload = match body {
        Ok(Json(Value::Object(map))) if !map.is_empty() => map,
        Ok(_) => return Err(ApiError::body_required()),
        Err(rejection) => {
            tracing::debug!("rejected create body: {rejection}");
            return Err(ApiError::body_required());
        }
    };

    // Conflict check and insert happen under one write guard.
    let mut store = state.store.write().await;
    let appointment = store.create(&payload)?;
    Ok((StatusCode::CREATED, Json(ApiOk::new(appointment))))
}

/* ============================================================
   PUT /appointments/{id}/status
   ============================================================ */

pub async fn update_appointment_status(
    State(state): State<AppState>,
    Path(appointment_id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ApiOk<Appointment>>, ApiError> {
    let Ok(Json(Value::Object(payload))) = body else {
        return Err(ApiError::status_required());
    };
    let Some(status) = payload.get("status") else {
        return Err(ApiError::status_required());
    };
    let status = match status {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };

    let mut store = state.store.write().await;
    let appointment = store.update_status(&appointment_id, &status)?;
    Ok(Json(ApiOk::new(appointment)))
}

/* ============================================================
   DELETE /appointments/{id}
   ============================================================ */

pub async fn delete_appointment(
    State(state): State<AppState>,
    Path(appointment_id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let deleted = state.store.write().await.delete(&appointment_id);
    let message = if deleted {
        "Appointment deleted successfully"
    } else {
        "Appointment not found"
    };

    Ok(Json(DeleteResponse {
        success: true,
        data: DeleteData { deleted },
        message: message.to_string(),
    }))
}
