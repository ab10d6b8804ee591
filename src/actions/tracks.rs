use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::fetch::{FetchError, validate_url};
use crate::track_store::TrackId;
use crate::tracks::Track;
use crate::web::AppState;

use super::{
    json_error,
    views::{TrackField, TrackView},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterTrackRequest {
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterTrackResponse {
    pub id: TrackId,
}

fn fetch_error_status(error: &FetchError) -> StatusCode {
    match error {
        FetchError::InvalidUrl { .. } | FetchError::UnsupportedScheme(_) => StatusCode::BAD_REQUEST,
        FetchError::Request(_) | FetchError::Status(_) | FetchError::TooLarge { .. } => {
            StatusCode::BAD_GATEWAY
        }
    }
}

/// Non-numeric IDs can never match a stored track
fn parse_track_id(raw: &str) -> Option<TrackId> {
    raw.parse().ok()
}

/// Handler for POST /igcinfo/api/igc
///
/// Fetches the IGC file at the given URL, parses it and registers the track.
#[tracing::instrument(skip_all)]
pub async fn register_track(
    State(state): State<AppState>,
    Json(request): Json<RegisterTrackRequest>,
) -> Response {
    if let Err(e) = validate_url(&request.url) {
        warn!("Rejected track URL {}: {}", request.url, e);
        return json_error(fetch_error_status(&e), &e.to_string()).into_response();
    }

    let raw = match state.fetcher.fetch(&request.url).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Failed to fetch track from {}: {}", request.url, e);
            return json_error(
                fetch_error_status(&e),
                &format!("Could not fetch track: {}", e),
            )
            .into_response();
        }
    };

    let track = match Track::from_igc(request.url.as_str(), &raw) {
        Ok(track) => track,
        Err(e) => {
            info!("Failed to parse IGC content from {}: {}", request.url, e);
            return json_error(
                StatusCode::BAD_REQUEST,
                &format!("Could not parse IGC content: {}", e),
            )
            .into_response();
        }
    };

    let fix_count = track.fixes.len();
    let distance_km = track.distance_km;
    let id = state.store.add(track);
    info!(
        "Registered track {} from {} ({} fixes, {:.2} km)",
        id, request.url, fix_count, distance_km
    );

    Json(RegisterTrackResponse { id }).into_response()
}

/// Handler for GET /igcinfo/api/igc
pub async fn list_track_ids(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.store.list_ids())
}

/// Handler for GET /igcinfo/api/igc/{id}
pub async fn get_track(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let Some(id) = parse_track_id(&id) else {
        return json_error(StatusCode::NOT_FOUND, "Track not found").into_response();
    };

    match state.store.get(id) {
        Ok(track) => Json(TrackView::from(track.as_ref())).into_response(),
        Err(e) => json_error(StatusCode::NOT_FOUND, &e.to_string()).into_response(),
    }
}

/// Handler for GET /igcinfo/api/igc/{id}/{field}
///
/// Returns the bare field value as plain text.
pub async fn get_track_field(
    State(state): State<AppState>,
    Path((id, field)): Path<(String, String)>,
) -> Response {
    let Some(id) = parse_track_id(&id) else {
        return json_error(StatusCode::NOT_FOUND, "Track not found").into_response();
    };

    let field = match field.parse::<TrackField>() {
        Ok(field) => field,
        Err(e) => return json_error(StatusCode::NOT_FOUND, &e.to_string()).into_response(),
    };

    let track = match state.store.get(id) {
        Ok(track) => track,
        Err(e) => return json_error(StatusCode::NOT_FOUND, &e.to_string()).into_response(),
    };

    match field.value(&track) {
        Some(value) => value.into_response(),
        None => json_error(StatusCode::NOT_FOUND, "Field not set for this track").into_response(),
    }
}
