//! Consecutive-crash circuit breaker.

use sqlx::SqliteConnection;

use crate::error::Result;
use crate::models::{Bot, LadderConfig};
use crate::repository::{BotRepository, MatchRepository};

const DISABLE_REASON: &str = "consecutive crash limit reached";

/// Disable a bot whose most recent N resolved participations are all
/// crash-type failures. Threshold below 1 disables the check; fewer than N
/// resolved participations is no action. Runs inside the result-commit
/// transaction, so the result that triggered it is already visible.
///
/// Returns the disabled bot so the caller can alert its owner after the
/// transaction commits.
pub(crate) async fn check_consecutive_crashes(
    tx: &mut SqliteConnection,
    config: &LadderConfig,
    bot_id: i64,
) -> Result<Option<Bot>> {
    let threshold = config.disable_bot_on_consecutive_crashes;
    if threshold < 1 {
        return Ok(None);
    }

    let recent =
        MatchRepository::recent_resolved_participations(&mut *tx, bot_id, threshold).await?;
    if (recent.len() as i64) < threshold {
        return Ok(None);
    }

    if recent.iter().any(|p| !p.is_crash_type()) {
        return Ok(None);
    }

    let bot = BotRepository::disable(&mut *tx, bot_id, DISABLE_REASON).await?;
    tracing::warn!(
        bot = %bot.name,
        owner = %bot.owner,
        threshold,
        "bot disabled after consecutive crashes"
    );

    Ok(Some(bot))
}
