//! Long-running background task that polls the Soroban RPC and writes
//! decoded GiftChain events to the database.
//!
//! Only events at least `confirmation_depth` ledgers behind the chain head are
//! stored. When a page ends in unconfirmed events the next poll restarts from
//! the first of them; inserts are idempotent, so the overlap is harmless.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::db;
use crate::rpc::{self, EventsPage, RawEvent};

pub struct IndexerState {
    pub pool: SqlitePool,
    pub config: Config,
    pub client: Client,
}

/// Where the next `getEvents` call starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub ledger: u32,
    pub cursor: Option<String>,
}

/// Run the indexer loop until `shutdown` is cancelled.
pub async fn run(state: Arc<IndexerState>, shutdown: CancellationToken) {
    info!("Indexer starting — contract: {}", state.config.contract_id);

    let (last_ledger, cursor) = db::load_cursor(&state.pool).await.unwrap_or_else(|e| {
        warn!("Could not read saved cursor, starting fresh: {e}");
        (0, None)
    });
    let mut position = Position {
        ledger: if last_ledger > 0 {
            last_ledger as u32
        } else {
            state.config.start_ledger
        },
        cursor,
    };

    info!("Resuming from ledger {}", position.ledger);

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            polled = poll_once(&state.pool, &state.client, &state.config, &position) => {
                match polled {
                    Ok(next) => position = next,
                    Err(e) => error!("Indexer poll error: {e}"),
                }
            }
        }

        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = tokio::time::sleep(Duration::from_secs(state.config.poll_interval_secs)) => {}
        }
    }

    info!("Indexer stopped at ledger {}", position.ledger);
}

/// Perform a single poll iteration and return where the next one starts.
async fn poll_once(
    pool: &SqlitePool,
    client: &Client,
    config: &Config,
    position: &Position,
) -> crate::errors::Result<Position> {
    let page = rpc::fetch_events(
        client,
        &config.rpc_url,
        &config.contract_id,
        position.ledger,
        position.cursor.as_deref(),
        config.events_per_page,
    )
    .await?;

    let (confirmed, first_unconfirmed) =
        split_confirmed(&page.events, page.latest_ledger, config.confirmation_depth);

    if !confirmed.is_empty() {
        let decoded = rpc::decode_events(confirmed, &config.contract_id);
        let inserted = db::insert_events(pool, &decoded).await?;
        info!(
            "Polled {} raw events → {} new records stored",
            page.events.len(),
            inserted
        );
    }

    let next = next_position(position, &page, first_unconfirmed);

    // Persist cursor so restarts are deterministic.
    db::save_cursor(pool, next.ledger as i64, next.cursor.as_deref()).await?;

    Ok(next)
}

/// Split a page into the confirmed prefix and the ledger of the first
/// unconfirmed event. Without a known chain head everything counts as
/// confirmed.
fn split_confirmed(
    events: &[RawEvent],
    latest_ledger: Option<u64>,
    depth: u32,
) -> (&[RawEvent], Option<u32>) {
    let Some(latest) = latest_ledger else {
        return (events, None);
    };
    let cutoff = latest.saturating_sub(depth as u64);
    match events
        .iter()
        .position(|e| e.ledger.unwrap_or(0) > cutoff)
    {
        Some(index) => (
            &events[..index],
            events[index].ledger.map(|l| l as u32),
        ),
        None => (events, None),
    }
}

fn next_position(current: &Position, page: &EventsPage, first_unconfirmed: Option<u32>) -> Position {
    if let Some(ledger) = first_unconfirmed {
        return Position {
            ledger,
            cursor: None,
        };
    }
    // A pagination cursor keeps the next call inside the same ledger range;
    // otherwise advance to the latest known ledger.
    Position {
        ledger: page
            .latest_ledger
            .map(|l| (l as u32).max(current.ledger))
            .unwrap_or(current.ledger),
        cursor: page.cursor.clone(),
    }
}
