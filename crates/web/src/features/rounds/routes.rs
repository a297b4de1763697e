use axum::{Router, routing::post};

use crate::state::AppState;

use super::handlers::generate_round;

pub fn routes() -> Router<AppState> {
    Router::new().route("/", post(generate_round))
}
