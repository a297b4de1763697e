use sqlx::SqliteExecutor;

use crate::error::{Result, StorageError};
use crate::models::Round;

const ROUND_COLUMNS: &str = "id, season_id, number, started, finished, complete";

pub struct RoundRepository;

impl RoundRepository {
    /// Create a round with the next sequence number for the season. Must be
    /// called inside the same transaction that generates the round's matches
    /// so two generators cannot claim the same number.
    pub async fn create(ex: impl SqliteExecutor<'_>, season_id: i64) -> Result<Round> {
        let round = sqlx::query_as::<_, Round>(&format!(
            "INSERT INTO rounds (season_id, number) \
             VALUES (?, (SELECT COUNT(*) + 1 FROM rounds WHERE season_id = ?)) \
             RETURNING {ROUND_COLUMNS}"
        ))
        .bind(season_id)
        .bind(season_id)
        .fetch_one(ex)
        .await?;

        Ok(round)
    }

    pub async fn find_by_id(ex: impl SqliteExecutor<'_>, id: i64) -> Result<Round> {
        sqlx::query_as::<_, Round>(&format!("SELECT {ROUND_COLUMNS} FROM rounds WHERE id = ?"))
            .bind(id)
            .fetch_optional(ex)
            .await?
            .ok_or(StorageError::NotFound)
    }

    /// Rounds still accepting or awaiting results, across all seasons.
    pub async fn incomplete_count(ex: impl SqliteExecutor<'_>) -> Result<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM rounds WHERE complete = FALSE")
                .fetch_one(ex)
                .await?;

        Ok(count)
    }

    pub async fn incomplete_count_for_season(
        ex: impl SqliteExecutor<'_>,
        season_id: i64,
    ) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM rounds WHERE season_id = ? AND complete = FALSE",
        )
        .bind(season_id)
        .fetch_one(ex)
        .await?;

        Ok(count)
    }

    /// Matches of this round that do not have a result yet.
    pub async fn unresolved_match_count(ex: impl SqliteExecutor<'_>, round_id: i64) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM matches m \
             LEFT JOIN results r ON r.match_id = m.id \
             WHERE m.round_id = ? AND r.id IS NULL",
        )
        .bind(round_id)
        .fetch_one(ex)
        .await?;

        Ok(count)
    }

    pub async fn mark_complete(
        ex: impl SqliteExecutor<'_>,
        round_id: i64,
        finished: chrono::NaiveDateTime,
    ) -> Result<()> {
        sqlx::query("UPDATE rounds SET complete = TRUE, finished = ? WHERE id = ?")
            .bind(finished)
            .bind(round_id)
            .execute(ex)
            .await?;

        Ok(())
    }
}
