use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// GNSS fix validity as recorded in the B record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixValidity {
    /// `A` - 3D fix
    ThreeD,
    /// `V` - 2D fix or no GNSS data
    TwoD,
}

impl FixValidity {
    pub fn from_flag(flag: u8) -> Option<Self> {
        match flag {
            b'A' => Some(Self::ThreeD),
            b'V' => Some(Self::TwoD),
            _ => None,
        }
    }
}

/// A single recorded position from an IGC B record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fix {
    /// UTC time of day the fix was recorded
    pub time: NaiveTime,

    /// Position in signed decimal degrees (south and west negative)
    pub latitude: f64,
    pub longitude: f64,

    pub validity: FixValidity,

    /// Altitudes in meters
    pub pressure_altitude_m: i32,
    pub gnss_altitude_m: i32,
}
