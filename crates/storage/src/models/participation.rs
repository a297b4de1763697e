use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Per-bot view of a match outcome, derived from the submitted absolute
/// outcome type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum RelativeOutcome {
    Win,
    Loss,
    Tie,
    /// The match produced no scored outcome (cancelled, engine error,
    /// failed initialization).
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum OutcomeCause {
    GameRules,
    Crash,
    Timeout,
    InitializationFailure,
    MatchCancelled,
    Error,
}

impl OutcomeCause {
    /// Causes the circuit breaker counts against a bot.
    pub fn is_crash_type(self) -> bool {
        matches!(
            self,
            OutcomeCause::Crash | OutcomeCause::Timeout | OutcomeCause::InitializationFailure
        )
    }
}

/// Join entity between a bot and a match. The outcome fields stay null
/// until the match's result is committed, then are permanently fixed.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MatchParticipation {
    pub id: i64,
    pub match_id: i64,
    pub bot_id: i64,
    pub participant_number: i64,
    pub outcome: Option<RelativeOutcome>,
    pub outcome_cause: Option<OutcomeCause>,
    pub avg_step_time: Option<f64>,
    pub match_log_url: Option<String>,
    pub resultant_elo: Option<i64>,
    pub elo_change: Option<i64>,
}

impl MatchParticipation {
    pub fn is_crash_type(&self) -> bool {
        self.outcome_cause.is_some_and(OutcomeCause::is_crash_type)
    }
}
