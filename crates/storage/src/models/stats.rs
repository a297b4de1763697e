use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Aggregate performance counters for one bot across all resolved matches.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BotStats {
    pub bot_id: i64,
    pub match_count: i64,
    pub win_count: i64,
    pub win_perc: f64,
    pub loss_count: i64,
    pub loss_perc: f64,
    pub tie_count: i64,
    pub tie_perc: f64,
    pub crash_count: i64,
    pub crash_perc: f64,
    pub highest_elo: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BotMatchupStats {
    pub bot_id: i64,
    pub opponent_id: i64,
    pub match_count: i64,
    pub win_count: i64,
    pub win_perc: f64,
    pub loss_count: i64,
    pub loss_perc: f64,
    pub tie_count: i64,
    pub tie_perc: f64,
    pub crash_count: i64,
    pub crash_perc: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BotMapStats {
    pub bot_id: i64,
    pub map_id: i64,
    pub match_count: i64,
    pub win_count: i64,
    pub win_perc: f64,
    pub loss_count: i64,
    pub loss_perc: f64,
    pub tie_count: i64,
    pub tie_perc: f64,
    pub crash_count: i64,
    pub crash_perc: f64,
}
