//! Result ingestion: validates a submitted result and commits every
//! downstream mutation — participations, bot in-match state, ratings,
//! round completion, circuit breaker — in one transaction. Anything that
//! fails before the commit leaves no trace.

use sqlx::{SqliteConnection, SqlitePool};

use crate::dto::arenaclient::SubmitResultRequest;
use crate::error::{Result, StorageError};
use crate::models::{Bot, LadderConfig, MatchParticipation, MatchResult};
use crate::repository::{BotRepository, MatchRepository, ResultRepository};

use super::{breaker, rating, scheduler};

/// Outcome of a committed submission. `disabled_bots` lists bots the
/// circuit breaker tripped on during this commit, so the caller can alert
/// their owners outside the transaction; `bot_ids` lets it trigger
/// follow-up work such as statistics refreshes.
#[derive(Debug)]
pub struct SubmittedResult {
    pub result: MatchResult,
    pub bot_ids: [i64; 2],
    pub disabled_bots: Vec<Bot>,
}

struct ParticipantInput<'a> {
    avg_step_time: Option<f64>,
    match_log_url: Option<&'a str>,
    bot_data_url: Option<&'a str>,
}

pub async fn submit_result(
    pool: &SqlitePool,
    config: &LadderConfig,
    submitted_by: &str,
    request: &SubmitResultRequest,
) -> Result<SubmittedResult> {
    if !config.ladder_enabled {
        return Err(StorageError::LadderDisabled);
    }

    validate_structure(request)?;

    if config.debug_submission_logging {
        tracing::debug!(
            match_id = request.match_id,
            bot1_avg_step_time = request.bot1_avg_step_time,
            bot2_avg_step_time = request.bot2_avg_step_time,
            "submission step times"
        );
    }

    let mut tx = pool.begin().await?;

    let m = MatchRepository::find_by_id(&mut *tx, request.match_id).await?;
    let (p1, p2) = MatchRepository::participations(&mut *tx, request.match_id).await?;

    // Write-once: the match-result link must not already be populated.
    // Checked before the bot gate, since a committed result has already
    // released both bots and a retry must still read as a duplicate.
    if ResultRepository::exists_for_match(&mut *tx, m.id).await? {
        return Err(StorageError::DuplicateResult(m.id));
    }

    // Integrity gate: both bots must still be in this exact match. Checked
    // for both before anything is written, so a stale submission cannot
    // leave one side half-updated.
    let bot1 = BotRepository::find_by_id(&mut *tx, p1.bot_id).await?;
    let bot2 = BotRepository::find_by_id(&mut *tx, p2.bot_id).await?;
    for bot in [&bot1, &bot2] {
        if bot.current_match_id != Some(m.id) {
            return Err(StorageError::BotNotInMatch(bot.name.clone()));
        }
    }

    let now = chrono::Utc::now().naive_utc();
    let result = ResultRepository::create(
        &mut *tx,
        m.id,
        request.outcome_type,
        request.replay_url.as_deref(),
        request.game_steps,
        submitted_by,
        request.arenaclient_log_url.as_deref(),
        now,
    )
    .await?;

    let inputs = [
        ParticipantInput {
            avg_step_time: request.bot1_avg_step_time,
            match_log_url: request.bot1_log_url.as_deref(),
            bot_data_url: request.bot1_data_url.as_deref(),
        },
        ParticipantInput {
            avg_step_time: request.bot2_avg_step_time,
            match_log_url: request.bot2_log_url.as_deref(),
            bot_data_url: request.bot2_data_url.as_deref(),
        },
    ];

    for (p, input) in [&p1, &p2].into_iter().zip(&inputs) {
        let (outcome, cause) = request.outcome_type.relative_outcome(p.participant_number);
        MatchRepository::record_outcome(
            &mut *tx,
            p.id,
            outcome,
            cause,
            input.avg_step_time,
            input.match_log_url,
        )
        .await?;
        BotRepository::leave_match(&mut *tx, p.bot_id, input.bot_data_url).await?;
    }

    apply_ratings(&mut *tx, config, request, &p1, &p2, bot1.elo, bot2.elo).await?;

    if config.enable_elo_sanity_check {
        check_rating_conservation(&mut *tx, config, result.id).await?;
    }

    scheduler::update_if_completed(&mut *tx, m.round_id).await?;

    let mut disabled_bots = Vec::new();
    for participant_number in request.outcome_type.crash_causing_participants() {
        let bot_id = if *participant_number == 1 { p1.bot_id } else { p2.bot_id };
        if let Some(bot) = breaker::check_consecutive_crashes(&mut *tx, config, bot_id).await? {
            disabled_bots.push(bot);
        }
    }

    tx.commit().await?;

    tracing::info!(
        result_id = result.id,
        match_id = m.id,
        outcome = ?request.outcome_type,
        submitted_by,
        "result committed"
    );

    Ok(SubmittedResult {
        result,
        bot_ids: [p1.bot_id, p2.bot_id],
        disabled_bots,
    })
}

/// Structural validation, mirrored from the request DTO's validators so the
/// pipeline holds its own invariants even when called without the web layer.
fn validate_structure(request: &SubmitResultRequest) -> Result<()> {
    for step_time in [request.bot1_avg_step_time, request.bot2_avg_step_time]
        .into_iter()
        .flatten()
    {
        if !step_time.is_finite() {
            return Err(StorageError::InvalidInput(
                "average step time must be finite".into(),
            ));
        }
    }

    if request.game_steps < 0 {
        return Err(StorageError::InvalidInput(
            "game_steps must be non-negative".into(),
        ));
    }

    Ok(())
}

/// Adjust both ratings zero-sum and fix the resultant rating and delta on
/// each participation. Unscored outcomes record the unchanged rating with a
/// zero delta so the ledger row is complete either way.
async fn apply_ratings(
    tx: &mut SqliteConnection,
    config: &LadderConfig,
    request: &SubmitResultRequest,
    p1: &MatchParticipation,
    p2: &MatchParticipation,
    elo1: i64,
    elo2: i64,
) -> Result<()> {
    let (outcome1, _) = request.outcome_type.relative_outcome(1);
    let delta = if request.outcome_type.is_scored() {
        rating::rating_delta(elo1, elo2, outcome1, config.elo_k)
    } else {
        0
    };

    let new_elo1 = BotRepository::adjust_elo(&mut *tx, p1.bot_id, delta).await?;
    let new_elo2 = BotRepository::adjust_elo(&mut *tx, p2.bot_id, -delta).await?;

    MatchRepository::record_rating(&mut *tx, p1.id, new_elo1, delta).await?;
    MatchRepository::record_rating(&mut *tx, p2.id, new_elo2, -delta).await?;

    Ok(())
}

/// Ratings are a zero-sum redistribution of `bot_count * starting_rating`.
/// A mismatch means accounting corruption somewhere; it is reported loudly
/// but never blocks the commit — detection, not prevention.
async fn check_rating_conservation(
    tx: &mut SqliteConnection,
    config: &LadderConfig,
    result_id: i64,
) -> Result<()> {
    let (actual, bot_count) = BotRepository::elo_sum_and_count(&mut *tx).await?;
    let expected = config.elo_start_value * bot_count;
    if actual != expected {
        tracing::error!(
            actual,
            expected,
            result_id,
            "rating sum mismatch detected on result submission"
        );
    }

    Ok(())
}
