//! Great-circle distance between two fixes.

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine distance in meters between two lat/lon points (degrees).
pub fn haversine_distance_m(lat_a: f64, lon_a: f64, lat_b: f64, lon_b: f64) -> f64 {
    let d_lat = (lat_b - lat_a).to_radians();
    let d_lon = (lon_b - lon_a).to_radians();

    let half_chord = (d_lat / 2.0).sin().powi(2)
        + lat_a.to_radians().cos() * lat_b.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let angle = 2.0 * half_chord.sqrt().asin();

    EARTH_RADIUS_M * angle
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_distance_for_identical_points() {
        assert_eq!(haversine_distance_m(37.0, -122.0, 37.0, -122.0), 0.0);
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let d = haversine_distance_m(37.0, -122.0, 38.0, -122.0);
        assert!((d - 111_195.0).abs() < 100.0, "got {d}");
    }

    #[test]
    fn distance_is_symmetric() {
        let ab = haversine_distance_m(37.0, -122.0, 37.01, -122.02);
        let ba = haversine_distance_m(37.01, -122.02, 37.0, -122.0);
        assert!((ab - ba).abs() < 1e-9);
    }
}
