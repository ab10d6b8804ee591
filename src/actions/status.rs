//! Service information endpoint

use axum::{Json, extract::State, response::IntoResponse};
use serde::{Deserialize, Serialize};

use crate::web::AppState;

pub const SERVICE_INFO: &str = "Service for IGC tracks.";
pub const API_VERSION: &str = "v1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    /// Time since the server started, as an ISO 8601 duration
    pub uptime: String,
    pub info: String,
    pub version: String,
}

/// Format seconds as an ISO 8601 duration, e.g. `PT0S`, `PT1M5S`, `P1DT2H`
pub fn format_iso8601_duration(seconds: u64) -> String {
    let days = seconds / 86400;
    let hours = (seconds % 86400) / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    let mut duration = String::from("P");
    if days > 0 {
        duration.push_str(&format!("{}D", days));
    }

    if hours == 0 && minutes == 0 && secs == 0 {
        if days == 0 {
            duration.push_str("T0S");
        }
        return duration;
    }

    duration.push('T');
    if hours > 0 {
        duration.push_str(&format!("{}H", hours));
    }
    if minutes > 0 {
        duration.push_str(&format!("{}M", minutes));
    }
    if secs > 0 {
        duration.push_str(&format!("{}S", secs));
    }
    duration
}

/// Handler for GET /igcinfo/api
#[tracing::instrument(skip_all)]
pub async fn get_service_info(State(state): State<AppState>) -> impl IntoResponse {
    Json(ServiceInfo {
        uptime: format_iso8601_duration(state.started_at.elapsed().as_secs()),
        info: SERVICE_INFO.to_string(),
        version: API_VERSION.to_string(),
    })
}
