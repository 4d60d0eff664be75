// HTTP request handlers
use crate::application::cat_service::weight_cards;
use crate::domain::range::RangeToken;
use crate::domain::weight::Day;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct ChartQuery {
    pub range: Option<String>,
}

#[derive(Deserialize)]
pub struct CardsQuery {
    #[serde(default)]
    pub day: Day,
}

#[derive(Serialize)]
pub struct RangeOption {
    pub value: RangeToken,
    pub label: &'static str,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Selectable chart ranges
pub async fn list_ranges() -> Json<Vec<RangeOption>> {
    Json(
        RangeToken::ALL
            .into_iter()
            .map(|value| RangeOption {
                value,
                label: value.label(),
            })
            .collect(),
    )
}

/// Weight cards for every cat
pub async fn list_cats(
    Query(query): Query<CardsQuery>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let cats = state.session.cats().await;
    Json(weight_cards(&cats, query.day))
}

/// Select a range (when given) and return the current chart view.
///
/// Remote ranges are fetched in the background; until the fetch lands the
/// view keeps the previous chart and reports `loading`.
pub async fn visits_chart(
    Query(query): Query<ChartQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    if let Some(raw) = query.range {
        let range = match raw.parse::<RangeToken>() {
            Ok(range) => range,
            Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
        };
        state.session.select(range).await;
    }

    Json(state.session.view().await).into_response()
}

/// CSV export of the chart currently on screen
pub async fn visits_csv(State(state): State<Arc<AppState>>) -> Response {
    match state.session.view().await.chart {
        Some(chart) => ([(header::CONTENT_TYPE, "text/csv")], chart.to_csv()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
