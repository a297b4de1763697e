use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::OutcomeType;

/// One participant as embedded in a lease response. Artifact fields are
/// opaque download references; the core never serves bytes.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LeasedBot {
    pub id: i64,
    pub name: String,
    pub bot_zip_url: String,
    pub bot_data_url: Option<String>,
}

/// Response to a match lease request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LeaseMatchResponse {
    pub id: i64,
    pub bot1: LeasedBot,
    pub bot2: LeasedBot,
    pub map: String,
}

/// A leased match plus whether it was reissued to a worker that already
/// held it.
#[derive(Debug, Clone)]
pub struct LeasedMatch {
    pub response: LeaseMatchResponse,
    pub reissued: bool,
}

/// Request payload for submitting a match result. Field names are the wire
/// contract with deployed arena clients.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SubmitResultRequest {
    #[serde(rename = "match")]
    pub match_id: i64,

    #[serde(rename = "type")]
    pub outcome_type: OutcomeType,

    pub replay_url: Option<String>,

    #[validate(range(min = 0, message = "game_steps must be non-negative"))]
    pub game_steps: i64,

    pub arenaclient_log_url: Option<String>,

    pub bot1_data_url: Option<String>,
    pub bot2_data_url: Option<String>,

    pub bot1_log_url: Option<String>,
    pub bot2_log_url: Option<String>,

    #[validate(custom(function = "validate_finite"))]
    pub bot1_avg_step_time: Option<f64>,

    #[validate(custom(function = "validate_finite"))]
    pub bot2_avg_step_time: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmitResultResponse {
    pub result_id: i64,
}

fn validate_finite(value: f64) -> Result<(), validator::ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(validator::ValidationError::new("not_finite"))
    }
}
