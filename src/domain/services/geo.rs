use crate::domain::models::point::Point;

const EARTH_RADIUS_MILES: f64 = 3958.7613;

/// Great-circle distance between two coordinates, in miles (haversine).
/// Symmetric, zero at identity.
pub fn distance_miles(a: &Point, b: &Point) -> f64 {
    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_MILES * h.sqrt().asin()
}

/// Canonical external unit is miles; providers take meters.
pub fn miles_to_meters(miles: f64) -> f64 {
    miles * 1609.344
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_is_symmetric() {
        let a = Point { lat: 40.7128, lon: -74.0060 };
        let b = Point { lat: 34.0522, lon: -118.2437 };
        assert_eq!(distance_miles(&a, &b), distance_miles(&b, &a));
    }

    #[test]
    fn test_distance_at_identity_is_zero() {
        let a = Point { lat: 51.5074, lon: -0.1278 };
        assert_eq!(distance_miles(&a, &a), 0.0);
    }

    #[test]
    fn test_known_distance_nyc_to_la() {
        let nyc = Point { lat: 40.7128, lon: -74.0060 };
        let la = Point { lat: 34.0522, lon: -118.2437 };
        let d = distance_miles(&nyc, &la);
        // Great-circle distance is ~2445 miles.
        assert!((d - 2445.0).abs() < 15.0, "got {}", d);
    }

    #[test]
    fn test_one_degree_latitude_is_about_69_miles() {
        let a = Point { lat: 40.0, lon: -74.0 };
        let b = Point { lat: 41.0, lon: -74.0 };
        let d = distance_miles(&a, &b);
        assert!((d - 69.0).abs() < 1.0, "got {}", d);
    }

    #[test]
    fn test_miles_to_meters() {
        assert_eq!(miles_to_meters(10.0), 16093.44);
    }
}
