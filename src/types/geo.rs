use serde::{Deserialize, Serialize};

/// A position in decimal degrees. Copied into the path, never shared.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// One sample from the location source. The reported speed is whatever the
/// positioning hardware measured, in meters per second; not every fix
/// carries one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationFix {
    pub point: GeoPoint,
    #[serde(default)]
    pub speed_mps: Option<f64>,
}

impl LocationFix {
    pub fn new(point: GeoPoint) -> Self {
        Self {
            point,
            speed_mps: None,
        }
    }

    pub fn with_speed(point: GeoPoint, speed_mps: f64) -> Self {
        Self {
            point,
            speed_mps: Some(speed_mps),
        }
    }
}

/// Great-circle distance between two points, in kilometers.
pub fn haversine_km(from: GeoPoint, to: GeoPoint) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;

    let d_lat = (to.lat - from.lat).to_radians();
    let d_lon = (to.lon - from.lon).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + from.lat.to_radians().cos() * to.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}
