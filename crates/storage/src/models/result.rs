use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::participation::{OutcomeCause, RelativeOutcome};

/// Absolute match outcome as reported by an arena client. The string forms
/// are the wire contract with deployed clients and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
pub enum OutcomeType {
    Player1Win,
    Player1Crash,
    Player1TimeOut,
    Player2Win,
    Player2Crash,
    Player2TimeOut,
    Tie,
    InitializationError,
    MatchCancelled,
    Error,
}

impl OutcomeType {
    pub const ALL: [OutcomeType; 10] = [
        OutcomeType::Player1Win,
        OutcomeType::Player1Crash,
        OutcomeType::Player1TimeOut,
        OutcomeType::Player2Win,
        OutcomeType::Player2Crash,
        OutcomeType::Player2TimeOut,
        OutcomeType::Tie,
        OutcomeType::InitializationError,
        OutcomeType::MatchCancelled,
        OutcomeType::Error,
    ];

    /// Derive a participant's relative outcome and its cause. Total over the
    /// enumeration and pure; crash and timeout losses carry their cause so
    /// the circuit breaker and crash statistics can count them.
    pub fn relative_outcome(self, participant_number: i64) -> (RelativeOutcome, OutcomeCause) {
        debug_assert!(participant_number == 1 || participant_number == 2);
        let first = participant_number == 1;
        match self {
            OutcomeType::Player1Win => Self::decided(first, OutcomeCause::GameRules),
            OutcomeType::Player2Win => Self::decided(!first, OutcomeCause::GameRules),
            OutcomeType::Player1Crash => Self::forfeited(first, OutcomeCause::Crash),
            OutcomeType::Player2Crash => Self::forfeited(!first, OutcomeCause::Crash),
            OutcomeType::Player1TimeOut => Self::forfeited(first, OutcomeCause::Timeout),
            OutcomeType::Player2TimeOut => Self::forfeited(!first, OutcomeCause::Timeout),
            OutcomeType::Tie => (RelativeOutcome::Tie, OutcomeCause::GameRules),
            OutcomeType::InitializationError => {
                (RelativeOutcome::None, OutcomeCause::InitializationFailure)
            }
            OutcomeType::MatchCancelled => (RelativeOutcome::None, OutcomeCause::MatchCancelled),
            OutcomeType::Error => (RelativeOutcome::None, OutcomeCause::Error),
        }
    }

    fn decided(winner: bool, cause: OutcomeCause) -> (RelativeOutcome, OutcomeCause) {
        if winner {
            (RelativeOutcome::Win, cause)
        } else {
            (RelativeOutcome::Loss, cause)
        }
    }

    /// A per-player failure: the failing side loses with the failure cause,
    /// the opponent wins by game rules.
    fn forfeited(failed: bool, cause: OutcomeCause) -> (RelativeOutcome, OutcomeCause) {
        if failed {
            (RelativeOutcome::Loss, cause)
        } else {
            (RelativeOutcome::Win, OutcomeCause::GameRules)
        }
    }

    /// Participant numbers whose failure caused this outcome; these are the
    /// bots the circuit breaker is evaluated against.
    pub fn crash_causing_participants(self) -> &'static [i64] {
        match self {
            OutcomeType::Player1Crash | OutcomeType::Player1TimeOut => &[1],
            OutcomeType::Player2Crash | OutcomeType::Player2TimeOut => &[2],
            OutcomeType::InitializationError => &[1, 2],
            _ => &[],
        }
    }

    /// Whether the ratings of the two participants are adjusted.
    pub fn is_scored(self) -> bool {
        !matches!(
            self,
            OutcomeType::InitializationError | OutcomeType::MatchCancelled | OutcomeType::Error
        )
    }
}

/// Write-once record of a finished match; the sole trigger for rating
/// adjustment, round completion and the circuit breaker.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MatchResult {
    pub id: i64,
    pub match_id: i64,
    pub outcome_type: OutcomeType,
    pub replay_url: Option<String>,
    pub game_steps: i64,
    pub submitted_by: String,
    pub arenaclient_log_url: Option<String>,
    pub created_at: chrono::NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_is_total_and_symmetric() {
        for outcome_type in OutcomeType::ALL {
            let (o1, _) = outcome_type.relative_outcome(1);
            let (o2, _) = outcome_type.relative_outcome(2);
            match (o1, o2) {
                (RelativeOutcome::Win, RelativeOutcome::Loss)
                | (RelativeOutcome::Loss, RelativeOutcome::Win)
                | (RelativeOutcome::Tie, RelativeOutcome::Tie)
                | (RelativeOutcome::None, RelativeOutcome::None) => {}
                other => panic!("inconsistent pair for {outcome_type:?}: {other:?}"),
            }
        }
    }

    #[test]
    fn failure_losses_carry_their_cause() {
        assert_eq!(
            OutcomeType::Player1Crash.relative_outcome(1),
            (RelativeOutcome::Loss, OutcomeCause::Crash)
        );
        assert_eq!(
            OutcomeType::Player1Crash.relative_outcome(2),
            (RelativeOutcome::Win, OutcomeCause::GameRules)
        );
        assert_eq!(
            OutcomeType::Player2TimeOut.relative_outcome(2),
            (RelativeOutcome::Loss, OutcomeCause::Timeout)
        );
        assert_eq!(
            OutcomeType::InitializationError.relative_outcome(1),
            (RelativeOutcome::None, OutcomeCause::InitializationFailure)
        );
    }

    #[test]
    fn crash_causers_match_the_failing_side() {
        assert_eq!(OutcomeType::Player1Crash.crash_causing_participants(), &[1]);
        assert_eq!(OutcomeType::Player2TimeOut.crash_causing_participants(), &[2]);
        assert_eq!(
            OutcomeType::InitializationError.crash_causing_participants(),
            &[1, 2]
        );
        assert!(OutcomeType::Tie.crash_causing_participants().is_empty());
        assert!(OutcomeType::Player1Win.crash_causing_participants().is_empty());
    }

    #[test]
    fn unscored_outcomes() {
        for outcome_type in OutcomeType::ALL {
            let scored = outcome_type.is_scored();
            let (o1, _) = outcome_type.relative_outcome(1);
            assert_eq!(scored, o1 != RelativeOutcome::None);
        }
    }
}
