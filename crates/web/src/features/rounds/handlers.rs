use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::repository::SettingsRepository;
use storage::services::scheduler;

use crate::error::WebError;
use crate::middleware::auth::Worker;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/api/rounds",
    responses(
        (status = 201, description = "Round generated", body = storage::models::Round),
        (status = 409, description = "A generation precondition failed"),
        (status = 401, description = "Missing or invalid worker token")
    ),
    security(("bearer_auth" = [])),
    tag = "rounds"
)]
pub async fn generate_round(
    State(state): State<AppState>,
    Worker(_worker): Worker,
) -> Result<Response, WebError> {
    let config = SettingsRepository::snapshot(state.db.pool()).await?;
    let round = scheduler::generate_round(state.db.pool(), &config).await?;

    Ok((StatusCode::CREATED, Json(round)).into_response())
}
