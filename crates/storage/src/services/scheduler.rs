//! Round generation and round-completion bookkeeping.

use rand::seq::SliceRandom;
use sqlx::{SqliteConnection, SqlitePool};

use crate::error::{Result, StorageError};
use crate::models::{LadderConfig, Round};
use crate::repository::{BotRepository, MapRepository, MatchRepository, RoundRepository, SeasonRepository};

/// Generate one full round of matches: every unordered pair of schedulable
/// bots plays once, each match on an independently chosen random active map.
/// All-or-nothing; on any precondition failure nothing is persisted.
pub async fn generate_round(pool: &SqlitePool, config: &LadderConfig) -> Result<Round> {
    let mut tx = pool.begin().await?;
    let round = generate_round_tx(&mut *tx, config).await?;
    tx.commit().await?;

    Ok(round)
}

/// Transaction-scoped round generation, also used by match leasing when the
/// pending queue runs dry. The caller's transaction serializes concurrent
/// generators, which is what keeps round numbers unique per season.
pub(crate) async fn generate_round_tx(
    tx: &mut SqliteConnection,
    config: &LadderConfig,
) -> Result<Round> {
    let maps = MapRepository::list_active(&mut *tx).await?;
    if maps.is_empty() {
        return Err(StorageError::NoMapsAvailable);
    }

    let bots = BotRepository::list_schedulable(&mut *tx).await?;
    if bots.len() < 2 {
        return Err(StorageError::InsufficientActiveBots);
    }

    let season = SeasonRepository::current(&mut *tx).await?;
    if season.paused {
        return Err(StorageError::SeasonPaused);
    }
    if season.closing {
        return Err(StorageError::SeasonClosing);
    }

    if RoundRepository::incomplete_count(&mut *tx).await? >= config.max_active_rounds {
        return Err(StorageError::TooManyActiveRounds);
    }

    let round = RoundRepository::create(&mut *tx, season.id).await?;

    for (i, bot1) in bots.iter().enumerate() {
        for bot2 in &bots[i + 1..] {
            // ThreadRng is !Send; it must not live across the awaits below.
            let map = maps
                .choose(&mut rand::thread_rng())
                .ok_or(StorageError::NoMapsAvailable)?;
            let m = MatchRepository::create(&mut *tx, round.id, map.id).await?;
            MatchRepository::add_participant(&mut *tx, m.id, bot1.id, 1).await?;
            MatchRepository::add_participant(&mut *tx, m.id, bot2.id, 2).await?;
        }
    }

    tracing::info!(
        round = round.number,
        season = season.number,
        matches = bots.len() * (bots.len() - 1) / 2,
        "generated round"
    );

    Ok(round)
}

/// Re-check the round-completion invariant after a result commit. Runs in
/// the same transaction as the commit, so two submissions that both finish
/// "the last match" cannot double-fire. Cheap when the round is still open
/// (a single count) and safe to call redundantly.
pub(crate) async fn update_if_completed(tx: &mut SqliteConnection, round_id: i64) -> Result<()> {
    if RoundRepository::unresolved_match_count(&mut *tx, round_id).await? > 0 {
        return Ok(());
    }

    let round = RoundRepository::find_by_id(&mut *tx, round_id).await?;
    if round.complete {
        return Ok(());
    }

    let now = chrono::Utc::now().naive_utc();
    RoundRepository::mark_complete(&mut *tx, round_id, now).await?;
    tracing::info!(round = round.number, "round complete");

    try_close_season(&mut *tx, round.season_id).await
}

/// A season that has been asked to close does so once its last round
/// finishes.
async fn try_close_season(tx: &mut SqliteConnection, season_id: i64) -> Result<()> {
    let season = SeasonRepository::find_by_id(&mut *tx, season_id).await?;
    if !season.closing || season.closed {
        return Ok(());
    }

    if RoundRepository::incomplete_count_for_season(&mut *tx, season_id).await? > 0 {
        return Ok(());
    }

    let now = chrono::Utc::now().naive_utc();
    SeasonRepository::mark_closed(&mut *tx, season_id, now).await?;
    tracing::info!(season = season.number, "season closed");

    Ok(())
}
