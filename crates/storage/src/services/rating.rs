//! Pairwise Elo adjustment. A single adjustment moves rating mass from one
//! participant to the other and nowhere else, so the sum of all ratings is
//! an invariant of the system (checked opportunistically at result commit).

use crate::models::RelativeOutcome;

/// Probability of the first rating beating the second under the standard
/// logistic expected-score curve.
pub fn expected_score(rating: i64, opponent: i64) -> f64 {
    1.0 / (1.0 + 10f64.powf((opponent - rating) as f64 / 400.0))
}

fn actual_score(outcome: RelativeOutcome) -> Option<f64> {
    match outcome {
        RelativeOutcome::Win => Some(1.0),
        RelativeOutcome::Loss => Some(0.0),
        RelativeOutcome::Tie => Some(0.5),
        RelativeOutcome::None => None,
    }
}

/// Rating change for participant 1; participant 2's change is the exact
/// negation, which is what makes conservation hold with integer ratings.
/// Returns zero for unscored outcomes.
pub fn rating_delta(rating1: i64, rating2: i64, outcome1: RelativeOutcome, k: i64) -> i64 {
    let Some(score) = actual_score(outcome1) else {
        return 0;
    };
    let expected = expected_score(rating1, rating2);
    (k as f64 * (score - expected)).round() as i64
}
