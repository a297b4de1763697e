use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Bot {
    pub id: i64,
    pub name: String,
    /// External identity of the bot's author; alerts are addressed to it.
    pub owner: String,
    pub elo: i64,
    pub active: bool,
    pub in_match: bool,
    pub current_match_id: Option<i64>,
    pub disabled: bool,
    pub disabled_reason: Option<String>,
    pub bot_zip_url: String,
    pub bot_data_url: Option<String>,
    pub created_at: chrono::NaiveDateTime,
}

impl Bot {
    /// Eligible for round scheduling.
    pub fn is_schedulable(&self) -> bool {
        self.active && !self.disabled
    }
}
