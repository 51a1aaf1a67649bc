use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS84 position in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Great-circle distance between two coordinates (haversine).
///
/// NaN inputs yield NaN.
pub fn distance_meters(a: Coordinate, b: Coordinate) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let d_phi = (b.lat - a.lat).to_radians();
    let d_lambda = (b.lon - a.lon).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    // rounding can push h a hair above 1 for antipodal points; f64::min would swallow NaN
    let h = if h > 1.0 { 1.0 } else { h };
    let c = 2.0 * h.sqrt().asin();

    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel_eq(a: f64, b: f64) -> bool {
        if a == b {
            return true;
        }
        (a - b).abs() <= 1e-6 * a.abs().max(b.abs())
    }

    #[test]
    fn test_zero_for_identical_points() {
        let p = Coordinate::new(34.0, -84.0);
        assert_eq!(distance_meters(p, p), 0.0);

        let origin = Coordinate::new(0.0, 0.0);
        assert_eq!(distance_meters(origin, origin), 0.0);
    }

    #[test]
    fn test_symmetry() {
        let pairs = [
            (Coordinate::new(34.0, -84.0), Coordinate::new(33.749, -84.388)),
            (Coordinate::new(52.52, 13.405), Coordinate::new(48.8566, 2.3522)),
            (Coordinate::new(-33.86, 151.21), Coordinate::new(40.71, -74.0)),
            (Coordinate::new(89.9, 0.0), Coordinate::new(-89.9, 179.9)),
        ];
        for (a, b) in pairs {
            assert!(rel_eq(distance_meters(a, b), distance_meters(b, a)));
        }
    }

    #[test]
    fn test_known_distance() {
        // Berlin -> Paris is roughly 878 km
        let berlin = Coordinate::new(52.52, 13.405);
        let paris = Coordinate::new(48.8566, 2.3522);
        let d = distance_meters(berlin, paris);
        assert!((d - 878_000.0).abs() < 5_000.0, "got {}", d);
    }

    #[test]
    fn test_one_degree_latitude() {
        let d = distance_meters(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 0.0));
        let expected = EARTH_RADIUS_M * std::f64::consts::PI / 180.0;
        assert!(rel_eq(d, expected));
    }

    #[test]
    fn test_antipodal_points_do_not_produce_nan() {
        let d = distance_meters(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 180.0));
        assert!(d.is_finite());
        assert!(rel_eq(d, EARTH_RADIUS_M * std::f64::consts::PI));
    }

    #[test]
    fn test_nan_propagates() {
        let d = distance_meters(Coordinate::new(f64::NAN, 0.0), Coordinate::new(1.0, 1.0));
        assert!(d.is_nan());
    }
}
