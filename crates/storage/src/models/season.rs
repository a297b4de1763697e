use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Container for rounds. `paused` and `closing` gate round generation;
/// a closing season is closed once its last round finishes.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Season {
    pub id: i64,
    pub number: i64,
    pub paused: bool,
    pub closing: bool,
    pub closed: bool,
    pub created_at: chrono::NaiveDateTime,
    pub date_closed: Option<chrono::NaiveDateTime>,
}
