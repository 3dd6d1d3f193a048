pub mod health;
pub mod trips;

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = match state.config.cors_origin.clone() {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any),
        None => CorsLayer::permissive(),
    };

    Router::new()
        .merge(health::router())
        .merge(trips::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
