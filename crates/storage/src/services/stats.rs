//! Batch statistics aggregation. A read-only consumer of the finalized
//! result ledger; never part of the result-commit transaction. Intended to
//! be run per bot after a batch of results, or for all bots periodically.

use sqlx::SqlitePool;

use crate::error::Result;
use crate::repository::StatsRepository;

/// Recompute the aggregate, per-opponent and per-map statistics rows for
/// one bot from the participation ledger. Upserts run in a single
/// transaction so concurrent refreshes of the same bot cannot interleave
/// into a torn row.
pub async fn refresh_bot_stats(pool: &SqlitePool, bot_id: i64) -> Result<()> {
    let mut tx = pool.begin().await?;

    let counts = StatsRepository::ledger_counts(&mut *tx, bot_id).await?;
    let highest_elo = StatsRepository::highest_elo(&mut *tx, bot_id).await?;
    StatsRepository::upsert_bot_stats(&mut *tx, bot_id, &counts, highest_elo).await?;

    for opponent_id in StatsRepository::opponent_ids(&mut *tx, bot_id).await? {
        let counts =
            StatsRepository::ledger_counts_vs_opponent(&mut *tx, bot_id, opponent_id).await?;
        StatsRepository::upsert_matchup_stats(&mut *tx, bot_id, opponent_id, &counts).await?;
    }

    for map_id in StatsRepository::played_map_ids(&mut *tx, bot_id).await? {
        let counts = StatsRepository::ledger_counts_on_map(&mut *tx, bot_id, map_id).await?;
        StatsRepository::upsert_map_stats(&mut *tx, bot_id, map_id, &counts).await?;
    }

    tx.commit().await?;

    tracing::debug!(bot_id, "refreshed bot statistics");

    Ok(())
}
