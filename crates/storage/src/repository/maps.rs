use sqlx::SqliteExecutor;

use crate::error::{Result, StorageError};
use crate::models::Map;

pub struct MapRepository;

impl MapRepository {
    pub async fn find_by_id(ex: impl SqliteExecutor<'_>, id: i64) -> Result<Map> {
        sqlx::query_as::<_, Map>("SELECT id, name, active, created_at FROM maps WHERE id = ?")
            .bind(id)
            .fetch_optional(ex)
            .await?
            .ok_or(StorageError::NotFound)
    }

    pub async fn list_active(ex: impl SqliteExecutor<'_>) -> Result<Vec<Map>> {
        let maps = sqlx::query_as::<_, Map>(
            "SELECT id, name, active, created_at FROM maps WHERE active = TRUE ORDER BY id",
        )
        .fetch_all(ex)
        .await?;

        Ok(maps)
    }

    pub async fn create(ex: impl SqliteExecutor<'_>, name: &str) -> Result<Map> {
        let map = sqlx::query_as::<_, Map>(
            "INSERT INTO maps (name) VALUES (?) RETURNING id, name, active, created_at",
        )
        .bind(name)
        .fetch_one(ex)
        .await?;

        Ok(map)
    }

    pub async fn set_active(ex: impl SqliteExecutor<'_>, map_id: i64, active: bool) -> Result<()> {
        sqlx::query("UPDATE maps SET active = ? WHERE id = ?")
            .bind(active)
            .bind(map_id)
            .execute(ex)
            .await?;

        Ok(())
    }
}
