use axum::{extract::State, routing::get, Json, Router};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, state::AppState};

/// Other methods on `/trips/health` address a trip whose id is `health`.
pub fn router() -> Router<AppState> {
    Router::new().route("/trips/health", get(health).fallback(unknown_trip))
}

async fn unknown_trip() -> AppError {
    AppError::NotFound
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: String,
    pub trips_count: usize,
    pub timestamp: String,
}

async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        trips_count: state.trips.count().await,
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}
