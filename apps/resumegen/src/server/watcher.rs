//! Modification-time polling on the watched source document.
//!
//! One poll step compares the current mtime against the last one seen;
//! any difference (including the file vanishing) counts as a change. The
//! regeneration completes before the reload token goes out, so a client
//! that refreshes immediately always sees the new page.

use std::path::Path;
use std::time::SystemTime;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::{ServerState, WATCH_INTERVAL};

/// Polls the source file until cancelled.
pub(crate) async fn watch_source(state: ServerState, cancel: CancellationToken) {
    info!("Watching file: {}", state.source.display());
    let mut last = mtime_of(&state.source).await;
    let mut ticker = tokio::time::interval(WATCH_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                poll_once(&state, &mut last).await;
            }
        }
    }
}

/// One poll step. Returns whether a change was acted on.
pub(crate) async fn poll_once(state: &ServerState, last: &mut Option<SystemTime>) -> bool {
    let current = mtime_of(&state.source).await;
    if current == *last {
        return false;
    }
    *last = current;
    info!("File changed, regenerating...");
    state.regenerate().await;
    state.hub.broadcast_reload().await;
    true
}

async fn mtime_of(path: &Path) -> Option<SystemTime> {
    match tokio::fs::metadata(path).await {
        Ok(meta) => meta.modified().ok(),
        Err(_) => None,
    }
}
