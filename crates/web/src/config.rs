use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Comma-separated `worker_name:token` pairs for arena client auth.
    pub worker_keys: String,
    /// Optional webhook target for result announcements and owner alerts.
    pub result_webhook_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: std::env::var("HOST").context("Cannot load HOST env variable")?,
            port: std::env::var("PORT")
                .context("PORT must be a number")?
                .parse()?,
            database_url: std::env::var("DATABASE_URL")
                .context("Cannot load DATABASE_URL env variable")?,
            worker_keys: std::env::var("WORKER_KEYS").unwrap_or_default(),
            result_webhook_url: std::env::var("RESULT_WEBHOOK_URL").ok(),
        })
    }
}
