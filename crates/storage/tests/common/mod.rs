#![allow(dead_code)]

use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

use storage::dto::arenaclient::SubmitResultRequest;
use storage::models::{Bot, LadderConfig, Map, OutcomeType};
use storage::repository::{BotRepository, MapRepository};
use storage::services::results::SubmittedResult;
use storage::services::{leasing, results};

/// Fresh in-memory database with the full schema applied. A single
/// connection keeps every query in the test on the same database.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool");

    storage::MIGRATOR.run(&pool).await.expect("migrations");

    pool
}

pub fn test_config() -> LadderConfig {
    LadderConfig::default()
}

pub async fn create_map(pool: &SqlitePool, name: &str) -> Map {
    MapRepository::create(pool, name).await.expect("create map")
}

pub async fn create_active_bot(pool: &SqlitePool, name: &str) -> Bot {
    let config = test_config();
    BotRepository::create(
        pool,
        name,
        &format!("{name}-owner"),
        &format!("http://files.test/{name}.zip"),
        config.elo_start_value,
        true,
    )
    .await
    .expect("create bot")
}

/// Two active bots and one active map, the smallest schedulable ladder.
pub async fn seed_minimal_ladder(pool: &SqlitePool) -> (Bot, Bot, Map) {
    let bot1 = create_active_bot(pool, "alpha").await;
    let bot2 = create_active_bot(pool, "beta").await;
    let map = create_map(pool, "AutomatonLE").await;

    (bot1, bot2, map)
}

pub fn result_request(match_id: i64, outcome_type: OutcomeType) -> SubmitResultRequest {
    SubmitResultRequest {
        match_id,
        outcome_type,
        replay_url: None,
        game_steps: 100,
        arenaclient_log_url: None,
        bot1_data_url: None,
        bot2_data_url: None,
        bot1_log_url: None,
        bot2_log_url: None,
        bot1_avg_step_time: None,
        bot2_avg_step_time: None,
    }
}

/// Lease the next match as `worker` and immediately submit `outcome_type`
/// for it.
pub async fn play_match(
    pool: &SqlitePool,
    config: &LadderConfig,
    worker: &str,
    outcome_type: OutcomeType,
) -> SubmittedResult {
    let leased = leasing::lease_next_match(pool, config, worker)
        .await
        .expect("lease match");
    assert!(!leased.reissued);

    results::submit_result(
        pool,
        config,
        worker,
        &result_request(leased.response.id, outcome_type),
    )
    .await
    .expect("submit result")
}

pub async fn match_count(pool: &SqlitePool) -> i64 {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM matches")
        .fetch_one(pool)
        .await
        .expect("count matches");

    count
}

pub async fn round_count(pool: &SqlitePool) -> i64 {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM rounds")
        .fetch_one(pool)
        .await
        .expect("count rounds");

    count
}
