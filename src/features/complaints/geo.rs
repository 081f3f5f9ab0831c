//! Great-circle geometry for the grouping engine.
//!
//! Accuracy degrades for antipodal points, which does not matter for a
//! search radius of about a hundred meters.

/// Earth's radius in kilometers (for the haversine formula)
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Meters spanned by one degree of latitude
pub const METERS_PER_DEGREE_LAT: f64 = 111_000.0;

/// Haversine distance between two points in meters.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c * 1000.0
}

/// Rectangular prefilter around a point.
///
/// Must stay a superset of the radius circle the distance check enforces,
/// never narrower.
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Box of ±`delta_degrees` latitude around `(lat, lon)`.
    ///
    /// The longitude window widens with latitude so the box keeps covering
    /// the same ground distance away from the equator.
    pub fn around(lat: f64, lon: f64, delta_degrees: f64) -> Self {
        let lon_delta = delta_degrees / lat.to_radians().cos().abs().max(0.01);

        Self {
            min_lat: lat - delta_degrees,
            max_lat: lat + delta_degrees,
            min_lon: lon - lon_delta,
            max_lon: lon + lon_delta,
        }
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lon >= self.min_lon && lon <= self.max_lon
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Reference point used across the engine tests (Joinville, Brazil)
    const BASE_LAT: f64 = -26.3045;
    const BASE_LON: f64 = -48.8487;

    #[test]
    fn test_haversine_same_point() {
        let distance = haversine_distance(BASE_LAT, BASE_LON, BASE_LAT, BASE_LON);

        assert!(distance < 1.0);
    }

    #[test]
    fn test_haversine_fifty_meters() {
        // 0.000449 degrees of latitude is just under 50 meters
        let distance = haversine_distance(BASE_LAT, BASE_LON, BASE_LAT + 0.000449, BASE_LON);

        assert!(distance > 45.0 && distance < 55.0, "got {}", distance);
    }

    #[test]
    fn test_haversine_two_hundred_meters() {
        let distance = haversine_distance(BASE_LAT, BASE_LON, BASE_LAT + 0.001797, BASE_LON);

        assert!(distance > 195.0 && distance < 205.0, "got {}", distance);
    }

    #[test]
    fn test_haversine_known_city_pair() {
        // Joinville to Curitiba, roughly 106km great-circle
        let curitiba = (-25.4284, -49.2733);

        let distance = haversine_distance(BASE_LAT, BASE_LON, curitiba.0, curitiba.1);

        assert!(distance > 100_000.0 && distance < 112_000.0, "got {}", distance);
    }

    #[test]
    fn test_bounding_box_covers_radius_circle() {
        let bbox = BoundingBox::around(BASE_LAT, BASE_LON, 0.001);

        // Walk the 100m circle; every point must fall inside the box. At
        // this latitude a fixed ±0.001° longitude window would already be
        // narrower than 100m, so this exercises the cosine widening.
        for step in 0..36 {
            let bearing = (step as f64 * 10.0).to_radians();
            let dlat = 100.0 * bearing.cos() / METERS_PER_DEGREE_LAT;
            let dlon =
                100.0 * bearing.sin() / (METERS_PER_DEGREE_LAT * BASE_LAT.to_radians().cos());

            assert!(
                bbox.contains(BASE_LAT + dlat, BASE_LON + dlon),
                "point at bearing {} fell outside the box",
                step * 10
            );
        }
    }

    #[test]
    fn test_bounding_box_excludes_far_points() {
        let bbox = BoundingBox::around(BASE_LAT, BASE_LON, 0.001);

        assert!(!bbox.contains(BASE_LAT + 0.002, BASE_LON));
        assert!(!bbox.contains(BASE_LAT, BASE_LON + 0.01));
    }
}
