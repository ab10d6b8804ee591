use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Serialize;

pub mod status;
pub mod tracks;
pub mod views;

pub use status::*;
pub use tracks::*;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub errors: String,
}

pub fn json_error(status: StatusCode, message: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            errors: message.to_string(),
        }),
    )
}

pub async fn handle_not_found() -> impl IntoResponse {
    json_error(StatusCode::NOT_FOUND, "Not Found")
}
