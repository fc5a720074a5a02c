//! Coordinates and great-circle distance.

use serde::{Deserialize, Serialize};

const EARTH_RADIUS_MILES: f64 = 3958.8;

/// A WGS84 point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns `true` for finite values with lat in [-90, 90] and lon in [-180, 180].
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Haversine distance to `other`, in miles.
    pub fn distance_miles(&self, other: &Coordinates) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_MILES * c
    }
}

/// Human-readable distance, e.g. `"1.3 mi"`.
pub fn format_distance(miles: f64) -> String {
    if miles < 0.1 {
        "0.1 mi".to_string()
    } else {
        format!("{:.1} mi", miles)
    }
}

/// Rounds to `places` decimals and formats without a negative zero.
pub fn format_rounded(value: f64, places: usize) -> String {
    let factor = 10f64.powi(places as i32);
    let rounded = (value * factor).round() / factor;
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{:.*}", places, rounded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validity_bounds() {
        assert!(Coordinates::new(90.0, 180.0).is_valid());
        assert!(Coordinates::new(-90.0, -180.0).is_valid());
        assert!(!Coordinates::new(90.1, 0.0).is_valid());
        assert!(!Coordinates::new(0.0, -180.5).is_valid());
        assert!(!Coordinates::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_distance_zero_for_same_point() {
        let tokyo = Coordinates::new(35.6762, 139.6503);
        assert!(tokyo.distance_miles(&tokyo) < 1e-9);
    }

    #[test]
    fn test_distance_known_pair() {
        // Tokyo Station to Shinjuku Station is roughly 3.8 miles.
        let tokyo_station = Coordinates::new(35.6812, 139.7671);
        let shinjuku = Coordinates::new(35.6896, 139.7006);
        let d = tokyo_station.distance_miles(&shinjuku);
        assert!((3.5..4.2).contains(&d), "got {d}");
    }

    #[test]
    fn test_format_rounded_strips_negative_zero() {
        assert_eq!(format_rounded(-0.0001, 3), "0.000");
        assert_eq!(format_rounded(35.67621, 3), "35.676");
        assert_eq!(format_rounded(139.65049, 3), "139.650");
    }

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(0.01), "0.1 mi");
        assert_eq!(format_distance(2.345), "2.3 mi");
    }
}
