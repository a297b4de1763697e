use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// One all-pairs batch of matches among the bots that were active when the
/// round was generated. `complete` holds iff every match has a result.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Round {
    pub id: i64,
    pub season_id: i64,
    /// 1-based, scoped to the season.
    pub number: i64,
    pub started: chrono::NaiveDateTime,
    pub finished: Option<chrono::NaiveDateTime>,
    pub complete: bool,
}
