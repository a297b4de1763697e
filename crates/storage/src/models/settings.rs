use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Snapshot of the operator-mutable ladder settings. Read once at the start
/// of each operation and passed through explicitly, so behavior within a
/// single operation never shifts under a concurrent settings change.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LadderConfig {
    pub ladder_enabled: bool,
    pub max_active_rounds: i64,
    /// 0 disables the circuit breaker.
    pub disable_bot_on_consecutive_crashes: i64,
    pub reissue_unfinished_matches: bool,
    pub enable_elo_sanity_check: bool,
    pub debug_submission_logging: bool,
    pub elo_k: i64,
    pub elo_start_value: i64,
}

impl Default for LadderConfig {
    fn default() -> Self {
        Self {
            ladder_enabled: true,
            max_active_rounds: 2,
            disable_bot_on_consecutive_crashes: 0,
            reissue_unfinished_matches: true,
            enable_elo_sanity_check: true,
            debug_submission_logging: false,
            elo_k: 16,
            elo_start_value: 1600,
        }
    }
}
