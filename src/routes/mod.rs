use crate::models::AppState;
use axum::Router;

pub mod appointment_routes;
pub mod health_routes;

pub fn router(state: AppState) -> Router {
    Router::new()
        .nest(
            "/api",
            appointment_routes::router().merge(health_routes::router()),
        )
        .with_state(state)
}
