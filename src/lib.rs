//! igcinfo - registry of IGC flight tracks
//!
//! Fetches IGC flight recorder files by URL, decodes their header and fix
//! records, computes the great-circle track length and keeps the resulting
//! tracks in memory under sequential integer IDs. The `web` module exposes
//! the registry over HTTP.

pub mod actions;
pub mod distance;
pub mod fetch;
pub mod fixes;
pub mod igc;
pub mod log_format;
pub mod track_store;
pub mod tracks;
pub mod web;

pub use fixes::Fix;
pub use igc::ParseError;
pub use track_store::{StoreError, TrackId, TrackStore};
pub use tracks::Track;
