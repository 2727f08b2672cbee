// src/pipeline/geo.rs
//! Great-circle distance and the distance bands shown on the near-me map.

use serde::{Deserialize, Serialize};

pub const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Haversine distance in kilometres.
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let a = (d_lat / 2.0).sin().powi(2)
            + self.lat.to_radians().cos() * other.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_KM * c
    }
}

/// Colour band of a marker by its distance from the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceBand {
    /// Under 5 km.
    Near,
    /// 5 to 20 km.
    Medium,
    /// 20 to 50 km.
    Far,
    Beyond,
}

impl DistanceBand {
    pub fn classify(distance_km: f64) -> Self {
        if distance_km < 5.0 {
            DistanceBand::Near
        } else if distance_km <= 20.0 {
            DistanceBand::Medium
        } else if distance_km <= 50.0 {
            DistanceBand::Far
        } else {
            DistanceBand::Beyond
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_to_self_is_zero() {
        let bangkok = GeoPoint::new(13.7563, 100.5018);
        assert!(bangkok.distance_km(&bangkok).abs() < 1e-9);
    }

    #[test]
    fn test_bangkok_to_chiang_mai() {
        let bangkok = GeoPoint::new(13.7563, 100.5018);
        let chiang_mai = GeoPoint::new(18.7883, 98.9853);
        let d = bangkok.distance_km(&chiang_mai);
        assert!((575.0..590.0).contains(&d), "unexpected distance {}", d);
        assert!((d - chiang_mai.distance_km(&bangkok)).abs() < 1e-9);
    }

    #[test]
    fn test_distance_bands() {
        assert_eq!(DistanceBand::classify(4.9), DistanceBand::Near);
        assert_eq!(DistanceBand::classify(5.0), DistanceBand::Medium);
        assert_eq!(DistanceBand::classify(20.0), DistanceBand::Medium);
        assert_eq!(DistanceBand::classify(50.0), DistanceBand::Far);
        assert_eq!(DistanceBand::classify(50.1), DistanceBand::Beyond);
    }
}
