use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// A single scheduled game between two bots on a map. `assigned_to` and
/// `started` are stamped when the match is leased to a worker; the match is
/// completed once a result row exists for it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Match {
    pub id: i64,
    pub round_id: i64,
    pub map_id: i64,
    pub created_at: chrono::NaiveDateTime,
    pub started: Option<chrono::NaiveDateTime>,
    pub assigned_to: Option<String>,
}
