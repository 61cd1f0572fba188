pub mod cookies;
pub mod error;
pub mod routes;
pub mod state;
pub mod views;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use error::{ApiError, PageError};
pub use state::{AppState, DashboardConfig};
pub use views::{render_connect_page, render_standup_page, StandupPage};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::home))
        .route("/connect", post(routes::connect))
        .route("/standup", get(routes::standup))
        .route("/standup/projects", post(routes::save_projects))
        .route("/api/projects", get(routes::projects_api))
        .route("/healthz", get(routes::healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
