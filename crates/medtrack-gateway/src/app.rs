use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::service::ScheduleService;

/// Central shared state — passed as Arc<AppState> to all Axum handlers.
pub struct AppState {
    pub service: ScheduleService,
}

impl AppState {
    pub fn new(service: ScheduleService) -> Self {
        Self { service }
    }
}

/// Assemble the full Axum router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(crate::http::health::health_handler))
        .route(
            "/schedule",
            post(crate::http::schedules::create_schedule)
                .get(crate::http::schedules::get_schedule),
        )
        .route("/schedules", get(crate::http::schedules::list_schedules))
        .route("/next_takings", get(crate::http::takings::next_takings))
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}
