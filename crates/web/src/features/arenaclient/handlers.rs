use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::dto::arenaclient::{LeaseMatchResponse, SubmitResultRequest, SubmitResultResponse};
use storage::services::stats;
use validator::Validate;

use crate::error::WebError;
use crate::middleware::auth::Worker;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    post,
    path = "/api/arenaclient/matches",
    responses(
        (status = 201, description = "New match leased to this worker", body = LeaseMatchResponse),
        (status = 200, description = "Unfinished match reissued to this worker", body = LeaseMatchResponse),
        (status = 503, description = "Ladder is disabled"),
        (status = 409, description = "No match could be generated"),
        (status = 401, description = "Missing or invalid worker token")
    ),
    security(("bearer_auth" = [])),
    tag = "arenaclient"
)]
pub async fn lease_match(
    State(state): State<AppState>,
    Worker(worker): Worker,
) -> Result<Response, WebError> {
    let leased = services::lease_match(&state.db, &worker).await?;

    let status = if leased.reissued {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };

    Ok((status, Json(leased.response)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/arenaclient/results",
    request_body = SubmitResultRequest,
    responses(
        (status = 201, description = "Result recorded", body = SubmitResultResponse),
        (status = 400, description = "Structurally invalid submission"),
        (status = 409, description = "Duplicate result or bot no longer in this match"),
        (status = 503, description = "Ladder is disabled"),
        (status = 401, description = "Missing or invalid worker token")
    ),
    security(("bearer_auth" = [])),
    tag = "arenaclient"
)]
pub async fn submit_result(
    State(state): State<AppState>,
    Worker(worker): Worker,
    Json(payload): Json<SubmitResultRequest>,
) -> Result<Response, WebError> {
    payload.validate()?;

    let submitted = services::submit_result(&state.db, &worker, &payload).await?;

    state
        .notifier
        .announce_result(&submitted.result, payload.outcome_type);
    for bot in &submitted.disabled_bots {
        state.notifier.alert_bot_disabled(bot);
    }

    // Statistics are recomputed from the ledger after the commit; a failed
    // refresh only delays the next one.
    for bot_id in submitted.bot_ids {
        let db = state.db.clone();
        tokio::spawn(async move {
            if let Err(e) = stats::refresh_bot_stats(db.pool(), bot_id).await {
                tracing::warn!(bot_id, "Statistics refresh failed: {}", e);
            }
        });
    }

    let response = SubmitResultResponse {
        result_id: submitted.result.id,
    };

    Ok((StatusCode::CREATED, Json(response)).into_response())
}
