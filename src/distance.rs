//! Great-circle track length

use crate::fixes::Fix;

/// Mean Earth radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculate the distance between two points using the Haversine formula
/// Returns distance in kilometers
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Sum of leg distances between consecutive fixes, in file order.
/// Zero for fewer than two fixes.
pub fn total_distance_km(fixes: &[Fix]) -> f64 {
    fixes
        .windows(2)
        .map(|leg| {
            haversine_km(
                leg[0].latitude,
                leg[0].longitude,
                leg[1].latitude,
                leg[1].longitude,
            )
        })
        .sum()
}
