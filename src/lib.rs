pub mod config;
pub mod conflict;
pub mod error;
pub mod models;
pub mod routes;
pub mod seed;
pub mod store;
pub mod validation;

use std::any::Any as PanicPayload;

use axum::Router;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::ApiError;
use crate::models::{AppState, Appointment};
use crate::store::AppointmentStore;

/// Full application router with CORS, request tracing and panic recovery.
pub fn app(state: AppState) -> Router {
    with_layers(routes::router(state))
}

pub fn with_layers(router: Router) -> Router {
    // Browser clients are served from a different origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn panic_response(payload: Box<dyn PanicPayload + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    };
    tracing::error!("handler panicked: {detail}");
    ApiError::Internal("Internal server error".into()).into_response()
}

/// Initial dataset according to configuration: seed file, built-in mock data, or nothing.
pub fn initial_appointments(cfg: &Config) -> anyhow::Result<Vec<Appointment>> {
    if let Some(path) = &cfg.seed_file {
        tracing::info!("loading appointments from seed file {}", path.display());
        return seed::load_seed_file(path);
    }
    if cfg.seed_mock_data {
        tracing::info!("loading built-in demo appointments");
        return Ok(seed::mock_appointments());
    }
    tracing::info!("starting with an empty appointment book");
    Ok(Vec::new())
}

pub fn build_state(cfg: &Config) -> anyhow::Result<AppState> {
    let initial = initial_appointments(cfg)?;
    let offered = initial.len();
    let store = AppointmentStore::new(initial);
    tracing::info!("appointment book ready: {} of {offered} seed record(s) accepted", store.len());
    Ok(AppState::new(store))
}
