//! 16-point compass rose math, the same geodesic bearing formula used by
//! `osmnx.bearing.calculate_bearing`.

use crate::coord::Coordinate;

pub const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW", "NNW",
];

/// Forward geodesic azimuth from `from` to `to`, in degrees `[0, 360)`.
pub fn bearing_degrees(from: &Coordinate, to: &Coordinate) -> f64 {
    let lat1 = from.lat().to_radians();
    let lat2 = to.lat().to_radians();
    let dlon = (to.lon() - from.lon()).to_radians();

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
    let bearing = y.atan2(x).to_degrees();
    (bearing + 360.0) % 360.0
}

/// Snap a bearing in degrees to the nearest of the 16 compass points.
pub fn compass_point(bearing_degrees: f64) -> &'static str {
    let normalized = ((bearing_degrees % 360.0) + 360.0) % 360.0;
    let index = (normalized / 22.5).round() as usize % 16;
    COMPASS_POINTS[index]
}

/// Convenience: bearing from `from` to `to`, snapped to the compass rose.
pub fn compass_direction(from: &Coordinate, to: &Coordinate) -> &'static str {
    compass_point(bearing_degrees(from, to))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn due_north_snaps_to_n() {
        let from = Coordinate::new(0.0, 0.0).unwrap();
        let to = Coordinate::new(1.0, 0.0).unwrap();
        assert_eq!(compass_direction(&from, &to), "N");
    }

    #[test]
    fn due_east_snaps_to_e() {
        let from = Coordinate::new(0.0, 0.0).unwrap();
        let to = Coordinate::new(0.0, 1.0).unwrap();
        assert_eq!(compass_direction(&from, &to), "E");
    }

    #[test]
    fn reciprocal_bearings_are_antipodal() {
        let a = Coordinate::new(49.1, -121.0).unwrap();
        let b = Coordinate::new(49.3, -121.3).unwrap();
        let fwd = bearing_degrees(&a, &b);
        let back = bearing_degrees(&b, &a);
        let diff = ((fwd - back + 180.0).rem_euclid(360.0) - 180.0).abs();
        assert!(diff < 11.25, "fwd={fwd} back={back} diff={diff}");
    }

    #[test]
    fn all_compass_points_are_in_fixed_set() {
        for i in 0..36 {
            let deg = i as f64 * 10.0;
            assert!(COMPASS_POINTS.contains(&compass_point(deg)));
        }
    }
}
