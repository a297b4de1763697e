use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Map {
    pub id: i64,
    pub name: String,
    pub active: bool,
    pub created_at: chrono::NaiveDateTime,
}
