use sqlx::SqliteExecutor;

use crate::error::{Result, StorageError};
use crate::models::Season;

const SEASON_COLUMNS: &str = "id, number, paused, closing, closed, created_at, date_closed";

pub struct SeasonRepository;

impl SeasonRepository {
    /// The season rounds are currently generated into: the newest one that
    /// has not been closed.
    pub async fn current(ex: impl SqliteExecutor<'_>) -> Result<Season> {
        sqlx::query_as::<_, Season>(&format!(
            "SELECT {SEASON_COLUMNS} FROM seasons WHERE closed = FALSE ORDER BY number DESC LIMIT 1"
        ))
        .fetch_optional(ex)
        .await?
        .ok_or(StorageError::NotFound)
    }

    pub async fn find_by_id(ex: impl SqliteExecutor<'_>, id: i64) -> Result<Season> {
        sqlx::query_as::<_, Season>(&format!(
            "SELECT {SEASON_COLUMNS} FROM seasons WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(ex)
        .await?
        .ok_or(StorageError::NotFound)
    }

    pub async fn set_paused(ex: impl SqliteExecutor<'_>, season_id: i64, paused: bool) -> Result<()> {
        sqlx::query("UPDATE seasons SET paused = ? WHERE id = ?")
            .bind(paused)
            .bind(season_id)
            .execute(ex)
            .await?;

        Ok(())
    }

    /// Request season closure; the season actually closes once its last
    /// round finishes.
    pub async fn set_closing(ex: impl SqliteExecutor<'_>, season_id: i64) -> Result<()> {
        sqlx::query("UPDATE seasons SET closing = TRUE WHERE id = ?")
            .bind(season_id)
            .execute(ex)
            .await?;

        Ok(())
    }

    pub async fn mark_closed(
        ex: impl SqliteExecutor<'_>,
        season_id: i64,
        when: chrono::NaiveDateTime,
    ) -> Result<()> {
        sqlx::query("UPDATE seasons SET closed = TRUE, date_closed = ? WHERE id = ?")
            .bind(when)
            .bind(season_id)
            .execute(ex)
            .await?;

        Ok(())
    }
}
