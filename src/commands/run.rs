use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use igcinfo::fetch::HttpFetcher;
use igcinfo::track_store::TrackStore;
use igcinfo::web::{AppState, start_web_server};
use tracing::info;

#[tracing::instrument(skip_all)]
pub async fn handle_run(
    interface: String,
    port: u16,
    fetch_timeout: Duration,
    max_track_bytes: usize,
) -> Result<()> {
    info!(
        "Track fetch timeout {}s, size limit {} bytes",
        fetch_timeout.as_secs(),
        max_track_bytes
    );

    let fetcher =
        HttpFetcher::new(fetch_timeout, max_track_bytes).context("Failed to build HTTP client")?;
    let state = AppState::new(TrackStore::new(), Arc::new(fetcher));

    start_web_server(&interface, port, state).await
}
