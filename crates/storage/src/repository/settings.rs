use sqlx::SqliteExecutor;

use crate::error::Result;
use crate::models::LadderConfig;

pub struct SettingsRepository;

impl SettingsRepository {
    /// Read the single settings row as an immutable snapshot. Every ladder
    /// operation takes one of these at its start instead of re-reading
    /// settings mid-flight.
    pub async fn snapshot(ex: impl SqliteExecutor<'_>) -> Result<LadderConfig> {
        let config = sqlx::query_as::<_, LadderConfig>(
            "SELECT ladder_enabled, max_active_rounds, disable_bot_on_consecutive_crashes, \
                    reissue_unfinished_matches, enable_elo_sanity_check, \
                    debug_submission_logging, elo_k, elo_start_value \
             FROM settings WHERE id = 1",
        )
        .fetch_one(ex)
        .await?;

        Ok(config)
    }

    pub async fn set_ladder_enabled(ex: impl SqliteExecutor<'_>, enabled: bool) -> Result<()> {
        sqlx::query("UPDATE settings SET ladder_enabled = ? WHERE id = 1")
            .bind(enabled)
            .execute(ex)
            .await?;

        Ok(())
    }

    pub async fn set_max_active_rounds(ex: impl SqliteExecutor<'_>, max: i64) -> Result<()> {
        sqlx::query("UPDATE settings SET max_active_rounds = ? WHERE id = 1")
            .bind(max)
            .execute(ex)
            .await?;

        Ok(())
    }

    pub async fn set_consecutive_crash_limit(ex: impl SqliteExecutor<'_>, limit: i64) -> Result<()> {
        sqlx::query("UPDATE settings SET disable_bot_on_consecutive_crashes = ? WHERE id = 1")
            .bind(limit)
            .execute(ex)
            .await?;

        Ok(())
    }

    pub async fn set_reissue_unfinished_matches(
        ex: impl SqliteExecutor<'_>,
        reissue: bool,
    ) -> Result<()> {
        sqlx::query("UPDATE settings SET reissue_unfinished_matches = ? WHERE id = 1")
            .bind(reissue)
            .execute(ex)
            .await?;

        Ok(())
    }
}
