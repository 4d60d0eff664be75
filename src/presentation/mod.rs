// Presentation layer - HTTP routes over the dashboard session
pub mod app_state;
pub mod handlers;

use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{health_check, list_cats, list_ranges, visits_chart, visits_csv};
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/ranges", get(list_ranges))
        .route("/cats", get(list_cats))
        .route("/charts/visits", get(visits_chart))
        .route("/charts/visits.csv", get(visits_csv))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
