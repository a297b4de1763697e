mod common;

use storage::error::StorageError;
use storage::models::{OutcomeType, RelativeOutcome};
use storage::repository::{
    BotRepository, MatchRepository, ResultRepository, RoundRepository, SeasonRepository,
};
use storage::services::{leasing, results, scheduler};

use common::*;

#[tokio::test]
async fn win_adjusts_ratings_zero_sum() {
    let pool = test_pool().await;
    let config = test_config();

    let (bot1, bot2, _) = seed_minimal_ladder(&pool).await;
    let submitted = play_match(&pool, &config, "arena1", OutcomeType::Player1Win).await;

    // Equal ratings, K=16: winner takes round(16 * 0.5) = 8 from the loser.
    let winner = BotRepository::find_by_id(&pool, bot1.id).await.unwrap();
    let loser = BotRepository::find_by_id(&pool, bot2.id).await.unwrap();
    assert_eq!(winner.elo, config.elo_start_value + 8);
    assert_eq!(loser.elo, config.elo_start_value - 8);
    assert_eq!(winner.elo + loser.elo, 2 * config.elo_start_value);

    let (p1, p2) = MatchRepository::participations(&pool, submitted.result.match_id)
        .await
        .unwrap();
    assert_eq!(p1.outcome, Some(RelativeOutcome::Win));
    assert_eq!(p2.outcome, Some(RelativeOutcome::Loss));
    assert_eq!(p1.elo_change, Some(8));
    assert_eq!(p2.elo_change, Some(-8));
    assert_eq!(p1.resultant_elo, Some(winner.elo));
    assert_eq!(p2.resultant_elo, Some(loser.elo));

    for bot in [&winner, &loser] {
        assert!(!bot.in_match);
        assert_eq!(bot.current_match_id, None);
    }
}

#[tokio::test]
async fn unscored_outcome_changes_no_ratings() {
    let pool = test_pool().await;
    let config = test_config();

    let (bot1, bot2, _) = seed_minimal_ladder(&pool).await;
    let submitted = play_match(&pool, &config, "arena1", OutcomeType::InitializationError).await;

    for id in [bot1.id, bot2.id] {
        let bot = BotRepository::find_by_id(&pool, id).await.unwrap();
        assert_eq!(bot.elo, config.elo_start_value);
    }

    let (p1, p2) = MatchRepository::participations(&pool, submitted.result.match_id)
        .await
        .unwrap();
    assert_eq!(p1.outcome, Some(RelativeOutcome::None));
    assert_eq!(p2.outcome, Some(RelativeOutcome::None));
    assert_eq!(p1.elo_change, Some(0));
    assert_eq!(p2.elo_change, Some(0));
    assert_eq!(p1.resultant_elo, Some(config.elo_start_value));
}

#[tokio::test]
async fn second_submission_reports_duplicate_result() {
    let pool = test_pool().await;
    let config = test_config();

    seed_minimal_ladder(&pool).await;

    let leased = leasing::lease_next_match(&pool, &config, "arena1")
        .await
        .unwrap();
    let match_id = leased.response.id;

    results::submit_result(
        &pool,
        &config,
        "arena1",
        &result_request(match_id, OutcomeType::Player1Win),
    )
    .await
    .unwrap();

    let first = ResultRepository::find_by_match(&pool, match_id).await.unwrap();

    let err = results::submit_result(
        &pool,
        &config,
        "arena1",
        &result_request(match_id, OutcomeType::Player2Win),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, StorageError::DuplicateResult(id) if id == match_id));
    assert!(err.is_conflict());

    // First result and its participations are untouched.
    let still = ResultRepository::find_by_match(&pool, match_id).await.unwrap();
    assert_eq!(still.id, first.id);
    assert_eq!(still.outcome_type, OutcomeType::Player1Win);

    let (p1, _) = MatchRepository::participations(&pool, match_id).await.unwrap();
    assert_eq!(p1.outcome, Some(RelativeOutcome::Win));
}

#[tokio::test]
async fn non_finite_step_time_leaves_no_trace() {
    let pool = test_pool().await;
    let config = test_config();

    let (bot1, _, _) = seed_minimal_ladder(&pool).await;

    let leased = leasing::lease_next_match(&pool, &config, "arena1")
        .await
        .unwrap();
    let mut request = result_request(leased.response.id, OutcomeType::Player1Win);
    request.bot1_avg_step_time = Some(f64::NAN);

    let err = results::submit_result(&pool, &config, "arena1", &request)
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::InvalidInput(_)));

    assert!(
        !ResultRepository::exists_for_match(&pool, leased.response.id)
            .await
            .unwrap()
    );
    let bot = BotRepository::find_by_id(&pool, bot1.id).await.unwrap();
    assert!(bot.in_match);
    assert_eq!(bot.elo, config.elo_start_value);
}

#[tokio::test]
async fn unleased_match_rejects_submission() {
    let pool = test_pool().await;
    let config = test_config();

    seed_minimal_ladder(&pool).await;
    scheduler::generate_round(&pool, &config).await.unwrap();

    // The match exists but was never leased, so neither bot points at it.
    let (match_id,): (i64,) = sqlx::query_as("SELECT id FROM matches LIMIT 1")
        .fetch_one(&pool)
        .await
        .unwrap();

    let err = results::submit_result(
        &pool,
        &config,
        "arena1",
        &result_request(match_id, OutcomeType::Player1Win),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, StorageError::BotNotInMatch(_)));
    assert!(!ResultRepository::exists_for_match(&pool, match_id).await.unwrap());
}

#[tokio::test]
async fn disabled_ladder_blocks_submission() {
    let pool = test_pool().await;
    let config = test_config();

    seed_minimal_ladder(&pool).await;
    let leased = leasing::lease_next_match(&pool, &config, "arena1")
        .await
        .unwrap();

    let mut disabled = config.clone();
    disabled.ladder_enabled = false;

    let err = results::submit_result(
        &pool,
        &disabled,
        "arena1",
        &result_request(leased.response.id, OutcomeType::Player1Win),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, StorageError::LadderDisabled));
}

#[tokio::test]
async fn round_completes_with_its_last_result() {
    let pool = test_pool().await;
    let config = test_config();

    for name in ["alpha", "beta", "gamma"] {
        create_active_bot(&pool, name).await;
    }
    create_map(&pool, "AutomatonLE").await;

    let round = scheduler::generate_round(&pool, &config).await.unwrap();

    play_match(&pool, &config, "arena1", OutcomeType::Player1Win).await;
    play_match(&pool, &config, "arena1", OutcomeType::Player2Win).await;

    let open = RoundRepository::find_by_id(&pool, round.id).await.unwrap();
    assert!(!open.complete);

    play_match(&pool, &config, "arena1", OutcomeType::Tie).await;

    let closed = RoundRepository::find_by_id(&pool, round.id).await.unwrap();
    assert!(closed.complete);
    assert!(closed.finished.is_some());
}

#[tokio::test]
async fn closing_season_closes_after_last_round() {
    let pool = test_pool().await;
    let config = test_config();

    seed_minimal_ladder(&pool).await;
    scheduler::generate_round(&pool, &config).await.unwrap();

    let season = SeasonRepository::current(&pool).await.unwrap();
    SeasonRepository::set_closing(&pool, season.id).await.unwrap();

    play_match(&pool, &config, "arena1", OutcomeType::Player1Win).await;

    let closed = SeasonRepository::find_by_id(&pool, season.id).await.unwrap();
    assert!(closed.closed);
    assert!(closed.date_closed.is_some());
}

#[tokio::test]
async fn submitted_bot_data_replaces_the_artifact() {
    let pool = test_pool().await;
    let config = test_config();

    let (bot1, bot2, _) = seed_minimal_ladder(&pool).await;
    let leased = leasing::lease_next_match(&pool, &config, "arena1")
        .await
        .unwrap();

    let mut request = result_request(leased.response.id, OutcomeType::Player1Win);
    request.bot1_data_url = Some("http://files.test/alpha-data-v2.zip".into());

    results::submit_result(&pool, &config, "arena1", &request)
        .await
        .unwrap();

    let updated = BotRepository::find_by_id(&pool, bot1.id).await.unwrap();
    assert_eq!(
        updated.bot_data_url.as_deref(),
        Some("http://files.test/alpha-data-v2.zip")
    );

    // No upload keeps the previous artifact.
    let untouched = BotRepository::find_by_id(&pool, bot2.id).await.unwrap();
    assert_eq!(untouched.bot_data_url, bot2.bot_data_url);
}
