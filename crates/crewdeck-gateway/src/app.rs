use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use crewdeck_access::AccessGate;
use crewdeck_core::config::CrewdeckConfig;
use crewdeck_crew::CrewManager;
use crewdeck_schedule::ScheduleManager;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::http;

/// Managers and config shared by every handler behind an `Arc`.
///
/// Each manager owns its own SQLite connection behind a std Mutex, so handlers
/// reach them through [`http::blocking`] rather than on the async executor.
pub struct AppState {
    pub config: CrewdeckConfig,
    pub crew: CrewManager,
    pub schedule: ScheduleManager,
    pub access: AccessGate,
}

impl AppState {
    pub fn new(
        config: CrewdeckConfig,
        crew: CrewManager,
        schedule: ScheduleManager,
        access: AccessGate,
    ) -> Self {
        Self {
            config,
            crew,
            schedule,
            access,
        }
    }
}

/// Assemble the full Axum router.
///
/// Crew and schedule routes sit behind the bearer-token middleware; `/`,
/// `/health` and `/api/login` are open.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/api/crew",
            get(http::crew::list_crew).post(http::crew::create_crew),
        )
        .route(
            "/api/crew/{id}",
            get(http::crew::get_crew)
                .put(http::crew::update_crew)
                .delete(http::crew::delete_crew),
        )
        .route(
            "/api/schedule",
            get(http::schedule::get_schedule).post(http::schedule::save_schedule),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            http::auth::require_token,
        ))
        .route("/", get(http::health::root_handler))
        .route("/health", get(http::health::health_handler))
        .route("/api/login", post(http::login::login_handler))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
