use sqlx::{FromRow, SqliteExecutor};

use crate::error::Result;
use crate::models::{BotMapStats, BotMatchupStats, BotStats};

/// Result types excluded from performance statistics: the match never
/// meaningfully took place.
const EXCLUDED_TYPES: &str = "('MatchCancelled', 'InitializationError', 'Error')";

/// Raw counters aggregated from the participation ledger.
#[derive(Debug, Clone, Copy, Default, FromRow)]
pub struct LedgerCounts {
    pub match_count: i64,
    pub win_count: i64,
    pub loss_count: i64,
    pub tie_count: i64,
    pub crash_count: i64,
}

fn ledger_counts_query() -> String {
    format!(
        "COUNT(*) AS match_count, \
         COALESCE(SUM(p.outcome = 'win'), 0) AS win_count, \
         COALESCE(SUM(p.outcome = 'loss'), 0) AS loss_count, \
         COALESCE(SUM(p.outcome = 'tie'), 0) AS tie_count, \
         COALESCE(SUM(p.outcome = 'loss' AND p.outcome_cause IN \
             ('crash', 'timeout', 'initialization_failure')), 0) AS crash_count \
         FROM match_participations p \
         JOIN results r ON r.match_id = p.match_id \
         WHERE p.bot_id = ? AND r.outcome_type NOT IN {EXCLUDED_TYPES}"
    )
}

pub struct StatsRepository;

impl StatsRepository {
    pub async fn bot_stats(ex: impl SqliteExecutor<'_>, bot_id: i64) -> Result<Option<BotStats>> {
        let stats = sqlx::query_as::<_, BotStats>(&format!(
            "SELECT bot_id, {COUNT_COLS}, highest_elo FROM bot_stats WHERE bot_id = ?"
        ))
        .bind(bot_id)
        .fetch_optional(ex)
        .await?;

        Ok(stats)
    }

    pub async fn matchup_stats(
        ex: impl SqliteExecutor<'_>,
        bot_id: i64,
        opponent_id: i64,
    ) -> Result<Option<BotMatchupStats>> {
        let stats = sqlx::query_as::<_, BotMatchupStats>(&format!(
            "SELECT bot_id, opponent_id, {COUNT_COLS} FROM bot_matchup_stats \
             WHERE bot_id = ? AND opponent_id = ?"
        ))
        .bind(bot_id)
        .bind(opponent_id)
        .fetch_optional(ex)
        .await?;

        Ok(stats)
    }

    pub async fn map_stats(
        ex: impl SqliteExecutor<'_>,
        bot_id: i64,
        map_id: i64,
    ) -> Result<Option<BotMapStats>> {
        let stats = sqlx::query_as::<_, BotMapStats>(&format!(
            "SELECT bot_id, map_id, {COUNT_COLS} FROM bot_map_stats \
             WHERE bot_id = ? AND map_id = ?"
        ))
        .bind(bot_id)
        .bind(map_id)
        .fetch_optional(ex)
        .await?;

        Ok(stats)
    }

    pub async fn ledger_counts(ex: impl SqliteExecutor<'_>, bot_id: i64) -> Result<LedgerCounts> {
        let counts = sqlx::query_as::<_, LedgerCounts>(&format!("SELECT {}", ledger_counts_query()))
            .bind(bot_id)
            .fetch_one(ex)
            .await?;

        Ok(counts)
    }

    pub async fn ledger_counts_vs_opponent(
        ex: impl SqliteExecutor<'_>,
        bot_id: i64,
        opponent_id: i64,
    ) -> Result<LedgerCounts> {
        let counts = sqlx::query_as::<_, LedgerCounts>(&format!(
            "SELECT {} AND EXISTS (SELECT 1 FROM match_participations o \
                 WHERE o.match_id = p.match_id AND o.bot_id = ?)",
            ledger_counts_query()
        ))
        .bind(bot_id)
        .bind(opponent_id)
        .fetch_one(ex)
        .await?;

        Ok(counts)
    }

    pub async fn ledger_counts_on_map(
        ex: impl SqliteExecutor<'_>,
        bot_id: i64,
        map_id: i64,
    ) -> Result<LedgerCounts> {
        let counts = sqlx::query_as::<_, LedgerCounts>(&format!(
            "SELECT {} AND EXISTS (SELECT 1 FROM matches m \
                 WHERE m.id = p.match_id AND m.map_id = ?)",
            ledger_counts_query()
        ))
        .bind(bot_id)
        .bind(map_id)
        .fetch_one(ex)
        .await?;

        Ok(counts)
    }

    pub async fn highest_elo(ex: impl SqliteExecutor<'_>, bot_id: i64) -> Result<Option<i64>> {
        let (highest,): (Option<i64>,) = sqlx::query_as(
            "SELECT MAX(resultant_elo) FROM match_participations WHERE bot_id = ?",
        )
        .bind(bot_id)
        .fetch_one(ex)
        .await?;

        Ok(highest)
    }

    /// Opponents this bot has actually faced in resolved matches.
    pub async fn opponent_ids(ex: impl SqliteExecutor<'_>, bot_id: i64) -> Result<Vec<i64>> {
        let rows: Vec<(i64,)> = sqlx::query_as(
            "SELECT DISTINCT o.bot_id FROM match_participations p \
             JOIN match_participations o \
               ON o.match_id = p.match_id AND o.bot_id != p.bot_id \
             JOIN results r ON r.match_id = p.match_id \
             WHERE p.bot_id = ?",
        )
        .bind(bot_id)
        .fetch_all(ex)
        .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Maps this bot has played resolved matches on.
    pub async fn played_map_ids(ex: impl SqliteExecutor<'_>, bot_id: i64) -> Result<Vec<i64>> {
        let rows: Vec<(i64,)> = sqlx::query_as(
            "SELECT DISTINCT m.map_id FROM match_participations p \
             JOIN matches m ON m.id = p.match_id \
             JOIN results r ON r.match_id = p.match_id \
             WHERE p.bot_id = ?",
        )
        .bind(bot_id)
        .fetch_all(ex)
        .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    pub async fn upsert_bot_stats(
        ex: impl SqliteExecutor<'_>,
        bot_id: i64,
        counts: &LedgerCounts,
        highest_elo: Option<i64>,
    ) -> Result<()> {
        sqlx::query(&format!(
            "INSERT INTO bot_stats (bot_id, {COUNT_COLS}, highest_elo) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
             ON CONFLICT (bot_id) DO UPDATE SET {COUNT_UPDATES}, \
                 highest_elo = excluded.highest_elo"
        ))
        .bind(bot_id)
        .bind(counts.match_count)
        .bind(counts.win_count)
        .bind(perc(counts.win_count, counts.match_count))
        .bind(counts.loss_count)
        .bind(perc(counts.loss_count, counts.match_count))
        .bind(counts.tie_count)
        .bind(perc(counts.tie_count, counts.match_count))
        .bind(counts.crash_count)
        .bind(perc(counts.crash_count, counts.match_count))
        .bind(highest_elo)
        .execute(ex)
        .await?;

        Ok(())
    }

    pub async fn upsert_matchup_stats(
        ex: impl SqliteExecutor<'_>,
        bot_id: i64,
        opponent_id: i64,
        counts: &LedgerCounts,
    ) -> Result<()> {
        sqlx::query(&format!(
            "INSERT INTO bot_matchup_stats (bot_id, opponent_id, {COUNT_COLS}) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
             ON CONFLICT (bot_id, opponent_id) DO UPDATE SET {COUNT_UPDATES}"
        ))
        .bind(bot_id)
        .bind(opponent_id)
        .bind(counts.match_count)
        .bind(counts.win_count)
        .bind(perc(counts.win_count, counts.match_count))
        .bind(counts.loss_count)
        .bind(perc(counts.loss_count, counts.match_count))
        .bind(counts.tie_count)
        .bind(perc(counts.tie_count, counts.match_count))
        .bind(counts.crash_count)
        .bind(perc(counts.crash_count, counts.match_count))
        .execute(ex)
        .await?;

        Ok(())
    }

    pub async fn upsert_map_stats(
        ex: impl SqliteExecutor<'_>,
        bot_id: i64,
        map_id: i64,
        counts: &LedgerCounts,
    ) -> Result<()> {
        sqlx::query(&format!(
            "INSERT INTO bot_map_stats (bot_id, map_id, {COUNT_COLS}) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
             ON CONFLICT (bot_id, map_id) DO UPDATE SET {COUNT_UPDATES}"
        ))
        .bind(bot_id)
        .bind(map_id)
        .bind(counts.match_count)
        .bind(counts.win_count)
        .bind(perc(counts.win_count, counts.match_count))
        .bind(counts.loss_count)
        .bind(perc(counts.loss_count, counts.match_count))
        .bind(counts.tie_count)
        .bind(perc(counts.tie_count, counts.match_count))
        .bind(counts.crash_count)
        .bind(perc(counts.crash_count, counts.match_count))
        .execute(ex)
        .await?;

        Ok(())
    }
}

const COUNT_COLS: &str = "match_count, win_count, win_perc, loss_count, loss_perc, \
     tie_count, tie_perc, crash_count, crash_perc";

const COUNT_UPDATES: &str = "match_count = excluded.match_count, \
     win_count = excluded.win_count, win_perc = excluded.win_perc, \
     loss_count = excluded.loss_count, loss_perc = excluded.loss_perc, \
     tie_count = excluded.tie_count, tie_perc = excluded.tie_perc, \
     crash_count = excluded.crash_count, crash_perc = excluded.crash_perc";

fn perc(count: i64, total: i64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}
