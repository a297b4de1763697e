//! Thin glue between handlers and the storage services: loads the current
//! ladder configuration snapshot so every operation runs against one
//! consistent view of the settings.

use storage::Database;
use storage::dto::arenaclient::{LeasedMatch, SubmitResultRequest};
use storage::error::Result;
use storage::repository::SettingsRepository;
use storage::services::{leasing, results};

pub async fn lease_match(db: &Database, worker: &str) -> Result<LeasedMatch> {
    let config = SettingsRepository::snapshot(db.pool()).await?;

    leasing::lease_next_match(db.pool(), &config, worker).await
}

pub async fn submit_result(
    db: &Database,
    worker: &str,
    request: &SubmitResultRequest,
) -> Result<results::SubmittedResult> {
    let config = SettingsRepository::snapshot(db.pool()).await?;

    results::submit_result(db.pool(), &config, worker, request).await
}
