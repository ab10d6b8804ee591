use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

use crate::tracks::Track;

/// JSON representation of a stored track
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackView {
    #[serde(rename = "H_date")]
    pub date: Option<NaiveDate>,
    pub pilot: Option<String>,
    pub glider: Option<String>,
    pub glider_id: Option<String>,
    /// Kilometers
    pub track_length: f64,
    pub track_src_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub co_pilot: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub competition_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub competition_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
}

impl From<&Track> for TrackView {
    fn from(track: &Track) -> Self {
        Self {
            date: track.date,
            pilot: track.pilot.clone(),
            glider: track.glider_type.clone(),
            glider_id: track.glider_id.clone(),
            track_length: track.distance_km,
            track_src_url: track.source_url.clone(),
            co_pilot: track.co_pilot.clone(),
            competition_id: track.competition_id.clone(),
            competition_class: track.competition_class.clone(),
            manufacturer: track.manufacturer.clone(),
        }
    }
}

/// A single track attribute addressable as `/igc/{id}/{field}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackField {
    Date,
    Pilot,
    Glider,
    GliderId,
    TrackLength,
    TrackSrcUrl,
    CoPilot,
    CompetitionId,
    CompetitionClass,
    Manufacturer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownField(pub String);

impl fmt::Display for UnknownField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown track field '{}'", self.0)
    }
}

impl FromStr for TrackField {
    type Err = UnknownField;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "H_date" => Ok(Self::Date),
            "pilot" => Ok(Self::Pilot),
            "glider" => Ok(Self::Glider),
            "glider_id" => Ok(Self::GliderId),
            "track_length" => Ok(Self::TrackLength),
            "track_src_url" => Ok(Self::TrackSrcUrl),
            "co_pilot" => Ok(Self::CoPilot),
            "competition_id" => Ok(Self::CompetitionId),
            "competition_class" => Ok(Self::CompetitionClass),
            "manufacturer" => Ok(Self::Manufacturer),
            other => Err(UnknownField(other.to_string())),
        }
    }
}

impl TrackField {
    /// Plain-text value of this field, `None` when the track doesn't carry it
    pub fn value(self, track: &Track) -> Option<String> {
        match self {
            Self::Date => track.date.map(|date| date.format("%Y-%m-%d").to_string()),
            Self::Pilot => track.pilot.clone(),
            Self::Glider => track.glider_type.clone(),
            Self::GliderId => track.glider_id.clone(),
            Self::TrackLength => Some(track.distance_km.to_string()),
            Self::TrackSrcUrl => Some(track.source_url.clone()),
            Self::CoPilot => track.co_pilot.clone(),
            Self::CompetitionId => track.competition_id.clone(),
            Self::CompetitionClass => track.competition_class.clone(),
            Self::Manufacturer => track.manufacturer.clone(),
        }
    }
}
