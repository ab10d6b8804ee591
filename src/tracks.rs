use chrono::NaiveDate;

use crate::distance::total_distance_km;
use crate::fixes::Fix;
use crate::igc::{self, IgcLog, ParseError};

/// A parsed flight track with its computed length
///
/// Tracks are built once from IGC content and never modified afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    /// URL the IGC file was fetched from
    pub source_url: String,

    /// Header metadata
    pub pilot: Option<String>,
    pub co_pilot: Option<String>,
    pub glider_type: Option<String>,
    pub glider_id: Option<String>,
    pub competition_id: Option<String>,
    pub competition_class: Option<String>,
    pub manufacturer: Option<String>,
    pub date: Option<NaiveDate>,

    /// Great-circle length over all fixes, in kilometers
    pub distance_km: f64,

    /// Fixes in file order
    pub fixes: Vec<Fix>,
}

impl Track {
    /// Parse IGC content and compute the track length.
    ///
    /// Fails without producing anything if the content does not parse.
    pub fn from_igc(source_url: impl Into<String>, raw: &[u8]) -> Result<Self, ParseError> {
        igc::parse(raw).map(|log| Self::from_log(source_url, log))
    }

    pub fn from_log(source_url: impl Into<String>, log: IgcLog) -> Self {
        let IgcLog { header, fixes } = log;
        let distance_km = total_distance_km(&fixes);

        Self {
            source_url: source_url.into(),
            pilot: header.pilot,
            co_pilot: header.co_pilot,
            glider_type: header.glider_type,
            glider_id: header.glider_id,
            competition_id: header.competition_id,
            competition_class: header.competition_class,
            manufacturer: header.manufacturer,
            date: header.date,
            distance_km,
            fixes,
        }
    }
}
