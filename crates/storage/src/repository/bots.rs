use sqlx::SqliteExecutor;

use crate::error::{Result, StorageError};
use crate::models::Bot;

const BOT_COLUMNS: &str = "id, name, owner, elo, active, in_match, current_match_id, \
     disabled, disabled_reason, bot_zip_url, bot_data_url, created_at";

pub struct BotRepository;

impl BotRepository {
    pub async fn find_by_id(ex: impl SqliteExecutor<'_>, id: i64) -> Result<Bot> {
        sqlx::query_as::<_, Bot>(&format!("SELECT {BOT_COLUMNS} FROM bots WHERE id = ?"))
            .bind(id)
            .fetch_optional(ex)
            .await?
            .ok_or(StorageError::NotFound)
    }

    /// Bots eligible for round scheduling: active and not disabled.
    pub async fn list_schedulable(ex: impl SqliteExecutor<'_>) -> Result<Vec<Bot>> {
        let bots = sqlx::query_as::<_, Bot>(&format!(
            "SELECT {BOT_COLUMNS} FROM bots WHERE active = TRUE AND disabled = FALSE ORDER BY id"
        ))
        .fetch_all(ex)
        .await?;

        Ok(bots)
    }

    pub async fn create(
        ex: impl SqliteExecutor<'_>,
        name: &str,
        owner: &str,
        bot_zip_url: &str,
        elo: i64,
        active: bool,
    ) -> Result<Bot> {
        let bot = sqlx::query_as::<_, Bot>(&format!(
            "INSERT INTO bots (name, owner, bot_zip_url, elo, active) \
             VALUES (?, ?, ?, ?, ?) \
             RETURNING {BOT_COLUMNS}"
        ))
        .bind(name)
        .bind(owner)
        .bind(bot_zip_url)
        .bind(elo)
        .bind(active)
        .fetch_one(ex)
        .await?;

        Ok(bot)
    }

    /// Mark a bot as playing the given match. Set at lease time, cleared by
    /// the result commit.
    pub async fn enter_match(ex: impl SqliteExecutor<'_>, bot_id: i64, match_id: i64) -> Result<()> {
        sqlx::query("UPDATE bots SET in_match = TRUE, current_match_id = ? WHERE id = ?")
            .bind(match_id)
            .bind(bot_id)
            .execute(ex)
            .await?;

        Ok(())
    }

    /// Clear the in-match marker and record an updated bot-data artifact if
    /// the worker uploaded one.
    pub async fn leave_match(
        ex: impl SqliteExecutor<'_>,
        bot_id: i64,
        bot_data_url: Option<&str>,
    ) -> Result<()> {
        sqlx::query(
            "UPDATE bots SET in_match = FALSE, current_match_id = NULL, \
             bot_data_url = COALESCE(?, bot_data_url) WHERE id = ?",
        )
        .bind(bot_data_url)
        .bind(bot_id)
        .execute(ex)
        .await?;

        Ok(())
    }

    pub async fn adjust_elo(ex: impl SqliteExecutor<'_>, bot_id: i64, delta: i64) -> Result<i64> {
        let (elo,): (i64,) =
            sqlx::query_as("UPDATE bots SET elo = elo + ? WHERE id = ? RETURNING elo")
                .bind(delta)
                .bind(bot_id)
                .fetch_one(ex)
                .await?;

        Ok(elo)
    }

    /// Permanently remove a bot from scheduling, recording why.
    pub async fn disable(ex: impl SqliteExecutor<'_>, bot_id: i64, reason: &str) -> Result<Bot> {
        let bot = sqlx::query_as::<_, Bot>(&format!(
            "UPDATE bots SET active = FALSE, disabled = TRUE, disabled_reason = ? \
             WHERE id = ? \
             RETURNING {BOT_COLUMNS}"
        ))
        .bind(reason)
        .bind(bot_id)
        .fetch_one(ex)
        .await?;

        Ok(bot)
    }

    /// Total rating mass across all bots, for the zero-sum integrity check.
    pub async fn elo_sum_and_count(ex: impl SqliteExecutor<'_>) -> Result<(i64, i64)> {
        let row: (i64, i64) =
            sqlx::query_as("SELECT COALESCE(SUM(elo), 0), COUNT(*) FROM bots")
                .fetch_one(ex)
                .await?;

        Ok(row)
    }
}
