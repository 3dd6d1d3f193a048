use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::{
    error::AppError,
    extract::{JsonBody, TripId},
    models::trip::{NewTrip, Trip, TripChanges},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/trips", get(list_trips).post(create_trip))
        .route(
            "/trips/:id",
            get(get_trip).put(update_trip).delete(delete_trip),
        )
}

async fn create_trip(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<NewTrip>,
) -> Result<(StatusCode, Json<Trip>), AppError> {
    let trip = state.trips.create(input).await?;
    Ok((StatusCode::CREATED, Json(trip)))
}

async fn list_trips(State(state): State<AppState>) -> Json<Vec<Trip>> {
    Json(state.trips.list().await)
}

async fn get_trip(
    State(state): State<AppState>,
    TripId(id): TripId,
) -> Result<Json<Trip>, AppError> {
    Ok(Json(state.trips.get(id).await?))
}

async fn update_trip(
    State(state): State<AppState>,
    TripId(id): TripId,
    JsonBody(changes): JsonBody<TripChanges>,
) -> Result<Json<Trip>, AppError> {
    Ok(Json(state.trips.update(id, changes).await?))
}

async fn delete_trip(
    State(state): State<AppState>,
    TripId(id): TripId,
) -> Result<StatusCode, AppError> {
    state.trips.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
