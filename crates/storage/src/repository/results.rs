use sqlx::SqliteExecutor;

use crate::error::{Result, StorageError};
use crate::models::{MatchResult, OutcomeType};

const RESULT_COLUMNS: &str = "id, match_id, outcome_type, replay_url, game_steps, \
     submitted_by, arenaclient_log_url, created_at";

pub struct ResultRepository;

impl ResultRepository {
    pub async fn exists_for_match(ex: impl SqliteExecutor<'_>, match_id: i64) -> Result<bool> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM results WHERE match_id = ?")
            .bind(match_id)
            .fetch_one(ex)
            .await?;

        Ok(count > 0)
    }

    /// Insert the write-once result row. The unique index on `match_id`
    /// backstops the explicit duplicate check in the ingestion pipeline.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        ex: impl SqliteExecutor<'_>,
        match_id: i64,
        outcome_type: OutcomeType,
        replay_url: Option<&str>,
        game_steps: i64,
        submitted_by: &str,
        arenaclient_log_url: Option<&str>,
        created_at: chrono::NaiveDateTime,
    ) -> Result<MatchResult> {
        let result = sqlx::query_as::<_, MatchResult>(&format!(
            "INSERT INTO results (match_id, outcome_type, replay_url, game_steps, \
                                  submitted_by, arenaclient_log_url, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?) \
             RETURNING {RESULT_COLUMNS}"
        ))
        .bind(match_id)
        .bind(outcome_type)
        .bind(replay_url)
        .bind(game_steps)
        .bind(submitted_by)
        .bind(arenaclient_log_url)
        .bind(created_at)
        .fetch_one(ex)
        .await
        .map_err(|e| {
            let err = StorageError::from(e);
            if err.is_unique_violation() {
                StorageError::DuplicateResult(match_id)
            } else {
                err
            }
        })?;

        Ok(result)
    }

    pub async fn find_by_match(ex: impl SqliteExecutor<'_>, match_id: i64) -> Result<MatchResult> {
        sqlx::query_as::<_, MatchResult>(&format!(
            "SELECT {RESULT_COLUMNS} FROM results WHERE match_id = ?"
        ))
        .bind(match_id)
        .fetch_optional(ex)
        .await?
        .ok_or(StorageError::NotFound)
    }
}
