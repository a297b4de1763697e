use sqlx::SqliteExecutor;

use crate::error::{Result, StorageError};
use crate::models::{Match, MatchParticipation, OutcomeCause, RelativeOutcome};

const MATCH_COLUMNS: &str = "id, round_id, map_id, created_at, started, assigned_to";

// For queries joining tables that also carry an `id` column.
const MATCH_COLUMNS_QUALIFIED: &str =
    "m.id, m.round_id, m.map_id, m.created_at, m.started, m.assigned_to";
const PARTICIPATION_COLUMNS: &str = "id, match_id, bot_id, participant_number, outcome, \
     outcome_cause, avg_step_time, match_log_url, resultant_elo, elo_change";

pub struct MatchRepository;

impl MatchRepository {
    pub async fn create(
        ex: impl SqliteExecutor<'_>,
        round_id: i64,
        map_id: i64,
    ) -> Result<Match> {
        let m = sqlx::query_as::<_, Match>(&format!(
            "INSERT INTO matches (round_id, map_id) VALUES (?, ?) RETURNING {MATCH_COLUMNS}"
        ))
        .bind(round_id)
        .bind(map_id)
        .fetch_one(ex)
        .await?;

        Ok(m)
    }

    pub async fn add_participant(
        ex: impl SqliteExecutor<'_>,
        match_id: i64,
        bot_id: i64,
        participant_number: i64,
    ) -> Result<()> {
        sqlx::query(
            "INSERT INTO match_participations (match_id, bot_id, participant_number) \
             VALUES (?, ?, ?)",
        )
        .bind(match_id)
        .bind(bot_id)
        .bind(participant_number)
        .execute(ex)
        .await?;

        Ok(())
    }

    pub async fn find_by_id(ex: impl SqliteExecutor<'_>, id: i64) -> Result<Match> {
        sqlx::query_as::<_, Match>(&format!("SELECT {MATCH_COLUMNS} FROM matches WHERE id = ?"))
            .bind(id)
            .fetch_optional(ex)
            .await?
            .ok_or(StorageError::NotFound)
    }

    /// Oldest assigned-but-unfinished match held by this worker, if any.
    /// Used for idempotent reissue on worker retry.
    pub async fn unfinished_for_worker(
        ex: impl SqliteExecutor<'_>,
        worker: &str,
    ) -> Result<Option<Match>> {
        let m = sqlx::query_as::<_, Match>(&format!(
            "SELECT {MATCH_COLUMNS_QUALIFIED} FROM matches m \
             WHERE m.assigned_to = ? AND m.started IS NOT NULL \
               AND NOT EXISTS (SELECT 1 FROM results r WHERE r.match_id = m.id) \
             ORDER BY m.round_id ASC, m.id ASC LIMIT 1"
        ))
        .bind(worker)
        .fetch_optional(ex)
        .await?;

        Ok(m)
    }

    /// Oldest pending match whose two bots are both free to play.
    pub async fn next_pending(ex: impl SqliteExecutor<'_>) -> Result<Option<Match>> {
        let m = sqlx::query_as::<_, Match>(&format!(
            "SELECT {MATCH_COLUMNS_QUALIFIED} FROM matches m \
             JOIN match_participations p1 \
               ON p1.match_id = m.id AND p1.participant_number = 1 \
             JOIN match_participations p2 \
               ON p2.match_id = m.id AND p2.participant_number = 2 \
             JOIN bots b1 ON b1.id = p1.bot_id \
             JOIN bots b2 ON b2.id = p2.bot_id \
             WHERE m.assigned_to IS NULL \
               AND b1.in_match = FALSE AND b2.in_match = FALSE \
               AND NOT EXISTS (SELECT 1 FROM results r WHERE r.match_id = m.id) \
             ORDER BY m.round_id ASC, m.id ASC LIMIT 1"
        ))
        .fetch_optional(ex)
        .await?;

        Ok(m)
    }

    pub async fn assign(
        ex: impl SqliteExecutor<'_>,
        match_id: i64,
        worker: &str,
        started: chrono::NaiveDateTime,
    ) -> Result<()> {
        sqlx::query("UPDATE matches SET assigned_to = ?, started = ? WHERE id = ?")
            .bind(worker)
            .bind(started)
            .bind(match_id)
            .execute(ex)
            .await?;

        Ok(())
    }

    /// Both participations of a match, ordered by participant number.
    pub async fn participations(
        ex: impl SqliteExecutor<'_>,
        match_id: i64,
    ) -> Result<(MatchParticipation, MatchParticipation)> {
        let mut rows = sqlx::query_as::<_, MatchParticipation>(&format!(
            "SELECT {PARTICIPATION_COLUMNS} FROM match_participations \
             WHERE match_id = ? ORDER BY participant_number"
        ))
        .bind(match_id)
        .fetch_all(ex)
        .await?;

        match (rows.pop(), rows.pop()) {
            (Some(second), Some(first)) if rows.is_empty() => Ok((first, second)),
            _ => Err(StorageError::NotFound),
        }
    }

    pub async fn record_outcome(
        ex: impl SqliteExecutor<'_>,
        participation_id: i64,
        outcome: RelativeOutcome,
        outcome_cause: OutcomeCause,
        avg_step_time: Option<f64>,
        match_log_url: Option<&str>,
    ) -> Result<()> {
        sqlx::query(
            "UPDATE match_participations \
             SET outcome = ?, outcome_cause = ?, avg_step_time = ?, match_log_url = ? \
             WHERE id = ?",
        )
        .bind(outcome)
        .bind(outcome_cause)
        .bind(avg_step_time)
        .bind(match_log_url)
        .bind(participation_id)
        .execute(ex)
        .await?;

        Ok(())
    }

    /// Fix the participation's rating figures; called exactly once, at
    /// result-commit time.
    pub async fn record_rating(
        ex: impl SqliteExecutor<'_>,
        participation_id: i64,
        resultant_elo: i64,
        elo_change: i64,
    ) -> Result<()> {
        sqlx::query(
            "UPDATE match_participations SET resultant_elo = ?, elo_change = ? WHERE id = ?",
        )
        .bind(resultant_elo)
        .bind(elo_change)
        .bind(participation_id)
        .execute(ex)
        .await?;

        Ok(())
    }

    /// The bot's most recent participations that have a result, newest
    /// first. Feeds the circuit breaker.
    pub async fn recent_resolved_participations(
        ex: impl SqliteExecutor<'_>,
        bot_id: i64,
        limit: i64,
    ) -> Result<Vec<MatchParticipation>> {
        let rows = sqlx::query_as::<_, MatchParticipation>(
            "SELECT p.id, p.match_id, p.bot_id, p.participant_number, p.outcome, \
                    p.outcome_cause, p.avg_step_time, p.match_log_url, p.resultant_elo, \
                    p.elo_change \
             FROM match_participations p \
             JOIN results r ON r.match_id = p.match_id \
             WHERE p.bot_id = ? \
             ORDER BY r.created_at DESC, r.id DESC LIMIT ?",
        )
        .bind(bot_id)
        .bind(limit)
        .fetch_all(ex)
        .await?;

        Ok(rows)
    }
}
