use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use trip_planner::config::AppConfig;
use trip_planner::error::AppError;
use trip_planner::routes::create_router;
use trip_planner::services::{store::TripStore, trips::TripService};
use trip_planner::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_logging();

    let config = AppConfig::from_env()?;
    let trips = TripService::new(TripStore::new());
    let state = AppState::new(config.clone(), trips);

    let app = create_router(state);

    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app.into_make_service())
        .await
        .context("server stopped unexpectedly")?;

    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,trip_planner=debug,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
