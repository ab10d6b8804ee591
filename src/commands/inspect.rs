use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveTime;
use igcinfo::actions::views::TrackView;
use igcinfo::tracks::Track;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Serialize)]
struct TrackSummary {
    #[serde(flatten)]
    track: TrackView,
    fixes: usize,
    first_fix: Option<NaiveTime>,
    last_fix: Option<NaiveTime>,
}

/// Parse a local IGC file and print its summary as JSON
pub fn handle_inspect(path: &Path) -> Result<()> {
    let raw = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let source = path.display().to_string();

    let track = Track::from_igc(source.as_str(), &raw)
        .with_context(|| format!("Failed to parse {}", source))?;
    info!(
        "Parsed {} fixes from {} ({:.2} km)",
        track.fixes.len(),
        source,
        track.distance_km
    );

    let summary = TrackSummary {
        track: TrackView::from(&track),
        fixes: track.fixes.len(),
        first_fix: track.fixes.first().map(|fix| fix.time),
        last_fix: track.fixes.last().map(|fix| fix.time),
    };

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
