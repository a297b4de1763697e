use axum::{Router, routing::post};

use crate::state::AppState;

use super::handlers::{lease_match, submit_result};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/matches", post(lease_match))
        .route("/results", post(submit_result))
}
