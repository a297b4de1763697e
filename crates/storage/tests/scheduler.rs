mod common;

use storage::error::StorageError;
use storage::repository::{BotRepository, MapRepository, SeasonRepository};
use storage::services::scheduler;

use common::*;

#[tokio::test]
async fn round_covers_every_pair_exactly_once() {
    let pool = test_pool().await;
    let config = test_config();

    for name in ["alpha", "beta", "gamma", "delta"] {
        create_active_bot(&pool, name).await;
    }
    create_map(&pool, "AutomatonLE").await;

    let round = scheduler::generate_round(&pool, &config).await.unwrap();
    assert_eq!(round.number, 1);
    assert!(!round.complete);

    assert_eq!(match_count(&pool).await, 6);

    // Every unordered pair appears once.
    let pairs: Vec<(i64, i64)> = sqlx::query_as(
        "SELECT p1.bot_id, p2.bot_id FROM matches m \
         JOIN match_participations p1 ON p1.match_id = m.id AND p1.participant_number = 1 \
         JOIN match_participations p2 ON p2.match_id = m.id AND p2.participant_number = 2 \
         WHERE m.round_id = ?",
    )
    .bind(round.id)
    .fetch_all(&pool)
    .await
    .unwrap();

    let mut normalized: Vec<(i64, i64)> = pairs
        .into_iter()
        .map(|(a, b)| (a.min(b), a.max(b)))
        .collect();
    normalized.sort_unstable();
    let before = normalized.len();
    normalized.dedup();
    assert_eq!(normalized.len(), before);
    assert_eq!(normalized.len(), 6);
}

#[tokio::test]
async fn disabled_bots_are_not_scheduled() {
    let pool = test_pool().await;
    let config = test_config();

    for name in ["alpha", "beta", "gamma"] {
        create_active_bot(&pool, name).await;
    }
    create_map(&pool, "AutomatonLE").await;

    let bots = BotRepository::list_schedulable(&pool).await.unwrap();
    BotRepository::disable(&pool, bots[2].id, "manual").await.unwrap();

    scheduler::generate_round(&pool, &config).await.unwrap();
    assert_eq!(match_count(&pool).await, 1);
}

#[tokio::test]
async fn deactivated_maps_are_not_used() {
    let pool = test_pool().await;
    let config = test_config();

    create_active_bot(&pool, "alpha").await;
    create_active_bot(&pool, "beta").await;
    let keep = create_map(&pool, "AutomatonLE").await;
    let bench = create_map(&pool, "CyberForestLE").await;
    MapRepository::set_active(&pool, bench.id, false).await.unwrap();

    let round = scheduler::generate_round(&pool, &config).await.unwrap();

    let map_ids: Vec<(i64,)> =
        sqlx::query_as("SELECT DISTINCT map_id FROM matches WHERE round_id = ?")
            .bind(round.id)
            .fetch_all(&pool)
            .await
            .unwrap();
    assert_eq!(map_ids, vec![(keep.id,)]);
}

// Scheduling runs inside spawned request handlers, so its futures have to
// stay Send.
#[tokio::test]
async fn generation_future_is_send() {
    fn assert_send<T: Send>(_: &T) {}

    let pool = test_pool().await;
    let config = test_config();
    seed_minimal_ladder(&pool).await;

    let fut = scheduler::generate_round(&pool, &config);
    assert_send(&fut);
    fut.await.unwrap();
}

#[tokio::test]
async fn fails_without_active_maps() {
    let pool = test_pool().await;
    let config = test_config();

    create_active_bot(&pool, "alpha").await;
    create_active_bot(&pool, "beta").await;

    let err = scheduler::generate_round(&pool, &config).await.unwrap_err();
    assert!(matches!(err, StorageError::NoMapsAvailable));
    assert_eq!(round_count(&pool).await, 0);
    assert_eq!(match_count(&pool).await, 0);
}

#[tokio::test]
async fn fails_with_fewer_than_two_bots() {
    let pool = test_pool().await;
    let config = test_config();

    create_active_bot(&pool, "alpha").await;
    create_map(&pool, "AutomatonLE").await;

    let err = scheduler::generate_round(&pool, &config).await.unwrap_err();
    assert!(matches!(err, StorageError::InsufficientActiveBots));
    assert_eq!(round_count(&pool).await, 0);
}

#[tokio::test]
async fn paused_season_blocks_generation() {
    let pool = test_pool().await;
    let config = test_config();

    seed_minimal_ladder(&pool).await;
    let season = SeasonRepository::current(&pool).await.unwrap();
    SeasonRepository::set_paused(&pool, season.id, true).await.unwrap();

    let err = scheduler::generate_round(&pool, &config).await.unwrap_err();
    assert!(matches!(err, StorageError::SeasonPaused));
    assert_eq!(round_count(&pool).await, 0);
}

#[tokio::test]
async fn closing_season_blocks_generation() {
    let pool = test_pool().await;
    let config = test_config();

    seed_minimal_ladder(&pool).await;
    let season = SeasonRepository::current(&pool).await.unwrap();
    SeasonRepository::set_closing(&pool, season.id).await.unwrap();

    let err = scheduler::generate_round(&pool, &config).await.unwrap_err();
    assert!(matches!(err, StorageError::SeasonClosing));
    assert_eq!(round_count(&pool).await, 0);
}

#[tokio::test]
async fn active_round_cap_blocks_generation() {
    let pool = test_pool().await;
    let config = test_config();

    seed_minimal_ladder(&pool).await;
    assert_eq!(config.max_active_rounds, 2);

    scheduler::generate_round(&pool, &config).await.unwrap();
    scheduler::generate_round(&pool, &config).await.unwrap();

    let err = scheduler::generate_round(&pool, &config).await.unwrap_err();
    assert!(matches!(err, StorageError::TooManyActiveRounds));
    assert_eq!(round_count(&pool).await, 2);
}

#[tokio::test]
async fn round_numbers_increase_within_a_season() {
    let pool = test_pool().await;
    let mut config = test_config();
    config.max_active_rounds = 10;

    seed_minimal_ladder(&pool).await;

    let first = scheduler::generate_round(&pool, &config).await.unwrap();
    let second = scheduler::generate_round(&pool, &config).await.unwrap();
    assert_eq!(first.number, 1);
    assert_eq!(second.number, 2);
}
