use serde_json::json;
use storage::models::{Bot, MatchResult, OutcomeType};

/// Best-effort webhook notifications. Every send runs on a detached task;
/// delivery failures are logged and never reach the request path.
#[derive(Clone)]
pub struct Notifier {
    client: reqwest::Client,
    webhook_url: Option<String>,
}

impl Notifier {
    pub fn new(webhook_url: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            webhook_url,
        }
    }

    pub fn announce_result(&self, result: &MatchResult, outcome_type: OutcomeType) {
        self.post(json!({
            "event": "result",
            "result_id": result.id,
            "match_id": result.match_id,
            "type": outcome_type,
            "game_steps": result.game_steps,
        }));
    }

    pub fn alert_bot_disabled(&self, bot: &Bot) {
        self.post(json!({
            "event": "bot_disabled",
            "bot_id": bot.id,
            "name": bot.name,
            "owner": bot.owner,
            "reason": bot.disabled_reason,
        }));
    }

    fn post(&self, payload: serde_json::Value) {
        let Some(url) = self.webhook_url.clone() else {
            return;
        };
        let client = self.client.clone();

        tokio::spawn(async move {
            if let Err(e) = client.post(&url).json(&payload).send().await {
                tracing::warn!("Webhook delivery failed: {}", e);
            }
        });
    }
}
