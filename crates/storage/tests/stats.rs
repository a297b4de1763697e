mod common;

use storage::models::OutcomeType;
use storage::repository::StatsRepository;
use storage::services::stats;

use common::*;

#[tokio::test]
async fn counts_match_the_ledger_and_exclude_void_results() {
    let pool = test_pool().await;
    let config = test_config();

    let (bot1, bot2, map) = seed_minimal_ladder(&pool).await;

    play_match(&pool, &config, "arena1", OutcomeType::Player1Win).await;
    play_match(&pool, &config, "arena1", OutcomeType::Player2Win).await;
    play_match(&pool, &config, "arena1", OutcomeType::Tie).await;
    play_match(&pool, &config, "arena1", OutcomeType::Player1Crash).await;
    // Void result: must not count toward any denominator.
    play_match(&pool, &config, "arena1", OutcomeType::MatchCancelled).await;

    stats::refresh_bot_stats(&pool, bot1.id).await.unwrap();

    let row = StatsRepository::bot_stats(&pool, bot1.id)
        .await
        .unwrap()
        .expect("aggregate row");

    assert_eq!(row.match_count, 4);
    assert_eq!(row.win_count, 1);
    assert_eq!(row.loss_count, 2);
    assert_eq!(row.tie_count, 1);
    assert_eq!(row.crash_count, 1);
    assert!((row.win_perc - 25.0).abs() < 1e-9);
    assert!((row.loss_perc - 50.0).abs() < 1e-9);
    assert!((row.tie_perc - 25.0).abs() < 1e-9);
    assert!((row.crash_perc - 25.0).abs() < 1e-9);

    // The post-first-win rating is the peak.
    assert_eq!(row.highest_elo, Some(config.elo_start_value + 8));

    // Matchup and map rows mirror the aggregate for a two-bot, one-map
    // ladder.
    let matchup = StatsRepository::matchup_stats(&pool, bot1.id, bot2.id)
        .await
        .unwrap()
        .expect("matchup row");
    assert_eq!(matchup.match_count, 4);
    assert_eq!(matchup.win_count, 1);

    let on_map = StatsRepository::map_stats(&pool, bot1.id, map.id)
        .await
        .unwrap()
        .expect("map row");
    assert_eq!(on_map.match_count, 4);
    assert_eq!(on_map.crash_count, 1);
}

#[tokio::test]
async fn refresh_is_idempotent() {
    let pool = test_pool().await;
    let config = test_config();

    let (bot1, _, _) = seed_minimal_ladder(&pool).await;
    play_match(&pool, &config, "arena1", OutcomeType::Player1Win).await;

    stats::refresh_bot_stats(&pool, bot1.id).await.unwrap();
    stats::refresh_bot_stats(&pool, bot1.id).await.unwrap();

    let row = StatsRepository::bot_stats(&pool, bot1.id)
        .await
        .unwrap()
        .expect("aggregate row");
    assert_eq!(row.match_count, 1);
    assert_eq!(row.win_count, 1);

    let (rows,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM bot_stats WHERE bot_id = ?")
        .bind(bot1.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(rows, 1);
}

#[tokio::test]
async fn bot_without_resolved_matches_gets_a_zero_row() {
    let pool = test_pool().await;

    let (bot1, _, _) = seed_minimal_ladder(&pool).await;

    stats::refresh_bot_stats(&pool, bot1.id).await.unwrap();

    let row = StatsRepository::bot_stats(&pool, bot1.id)
        .await
        .unwrap()
        .expect("aggregate row");
    assert_eq!(row.match_count, 0);
    assert!((row.win_perc - 0.0).abs() < 1e-9);
    assert_eq!(row.highest_elo, None);
}
