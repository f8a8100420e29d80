pub mod link;

use axum::{routing::post, Router};

use crate::state::AppState;

/// Create router for linking endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", post(link::link_entity))
        .with_state(state)
}
