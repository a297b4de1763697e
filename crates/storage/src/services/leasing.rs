//! Hands pending matches to arena clients.

use sqlx::{SqliteConnection, SqlitePool};

use crate::dto::arenaclient::{LeaseMatchResponse, LeasedBot, LeasedMatch};
use crate::error::{Result, StorageError};
use crate::models::{LadderConfig, Match};
use crate::repository::{BotRepository, MapRepository, MatchRepository};

use super::scheduler;

/// Lease the next match to a worker.
///
/// With reissue enabled, a worker that already holds an assigned, started,
/// unfinished match gets that same match back (oldest round first) — a
/// worker that crashed mid-match and reconnects resumes instead of piling
/// up leases. Otherwise the oldest pending match whose bots are both free
/// is assigned and started; when the queue is empty a new round is
/// generated in the same transaction and the lease retried once.
pub async fn lease_next_match(
    pool: &SqlitePool,
    config: &LadderConfig,
    worker: &str,
) -> Result<LeasedMatch> {
    if !config.ladder_enabled {
        return Err(StorageError::LadderDisabled);
    }

    let mut tx = pool.begin().await?;

    if config.reissue_unfinished_matches {
        if let Some(m) = MatchRepository::unfinished_for_worker(&mut *tx, worker).await? {
            tracing::debug!(match_id = m.id, worker, "reissuing unfinished match");
            let response = build_response(&mut *tx, &m).await?;
            tx.commit().await?;
            return Ok(LeasedMatch {
                response,
                reissued: true,
            });
        }
    }

    let m = match MatchRepository::next_pending(&mut *tx).await? {
        Some(m) => m,
        None => {
            scheduler::generate_round_tx(&mut *tx, config).await?;
            MatchRepository::next_pending(&mut *tx)
                .await?
                .ok_or(StorageError::NotFound)?
        }
    };

    let now = chrono::Utc::now().naive_utc();
    MatchRepository::assign(&mut *tx, m.id, worker, now).await?;

    let (p1, p2) = MatchRepository::participations(&mut *tx, m.id).await?;
    BotRepository::enter_match(&mut *tx, p1.bot_id, m.id).await?;
    BotRepository::enter_match(&mut *tx, p2.bot_id, m.id).await?;

    let response = build_response(&mut *tx, &m).await?;
    tx.commit().await?;

    tracing::info!(match_id = m.id, worker, "leased match");

    Ok(LeasedMatch {
        response,
        reissued: false,
    })
}

async fn build_response(tx: &mut SqliteConnection, m: &Match) -> Result<LeaseMatchResponse> {
    let (p1, p2) = MatchRepository::participations(&mut *tx, m.id).await?;
    let bot1 = BotRepository::find_by_id(&mut *tx, p1.bot_id).await?;
    let bot2 = BotRepository::find_by_id(&mut *tx, p2.bot_id).await?;
    let map = MapRepository::find_by_id(&mut *tx, m.map_id).await?;

    Ok(LeaseMatchResponse {
        id: m.id,
        bot1: LeasedBot {
            id: bot1.id,
            name: bot1.name,
            bot_zip_url: bot1.bot_zip_url,
            bot_data_url: bot1.bot_data_url,
        },
        bot2: LeasedBot {
            id: bot2.id,
            name: bot2.name,
            bot_zip_url: bot2.bot_zip_url,
            bot_data_url: bot2.bot_data_url,
        },
        map: map.name,
    })
}
