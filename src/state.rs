use crate::{config::AppConfig, services::trips::TripService};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub trips: TripService,
}

impl AppState {
    pub fn new(config: AppConfig, trips: TripService) -> Self {
        Self { config, trips }
    }
}
