use serde::{Deserialize, Serialize};

/// A WGS84 geographic point: latitude in `[-90, 90]`, longitude in `[-180, 180]`.
///
/// Following the pattern in `odin_common::geo` we wrap the raw `f64` pair in a
/// newtype so bounds-validation happens once, at construction, rather than at
/// every call site that consumes a coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Option<Self> {
        if Self::valid(lat, lon) {
            Some(Coordinate { lat, lon })
        } else {
            None
        }
    }

    #[inline]
    pub fn valid(lat: f64, lon: f64) -> bool {
        lat.is_finite() && lon.is_finite() && (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon)
    }

    #[inline]
    pub fn lat(&self) -> f64 {
        self.lat
    }

    #[inline]
    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Project to EPSG:3857 (Web Mercator), the planar metric space all
    /// distance work in this crate happens in. Axis order is explicit:
    /// `(lon, lat)` in, `(x, y)` meters out.
    pub fn to_web_mercator(&self) -> (f64, f64) {
        web_mercator_forward(self.lon, self.lat)
    }

    pub fn as_geo_point(&self) -> geo_types::Point<f64> {
        let (x, y) = self.to_web_mercator();
        geo_types::Point::new(x, y)
    }
}

const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Forward Web Mercator projection: geodetic degrees -> EPSG:3857 meters.
pub fn web_mercator_forward(lon: f64, lat: f64) -> (f64, f64) {
    let x = lon.to_radians() * EARTH_RADIUS_M;
    let lat_clamped = lat.clamp(-85.05112878, 85.05112878);
    let y = EARTH_RADIUS_M * ((std::f64::consts::FRAC_PI_4 + lat_clamped.to_radians() / 2.0).tan()).ln();
    (x, y)
}

/// Inverse Web Mercator projection: EPSG:3857 meters -> geodetic degrees (lon, lat).
pub fn web_mercator_inverse(x: f64, y: f64) -> (f64, f64) {
    let lon = (x / EARTH_RADIUS_M).to_degrees();
    let lat = (2.0 * (y / EARTH_RADIUS_M).exp().atan() - std::f64::consts::FRAC_PI_2).to_degrees();
    (lon, lat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_boundary_coordinates() {
        assert!(Coordinate::new(0.0, 0.0).is_some());
        assert!(Coordinate::new(90.0, 0.0).is_some());
        assert!(Coordinate::new(-90.0, 0.0).is_some());
        assert!(Coordinate::new(0.0, 180.0).is_some());
        assert!(Coordinate::new(0.0, -180.0).is_some());
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        assert!(Coordinate::new(91.0, 0.0).is_none());
        assert!(Coordinate::new(0.0, 181.0).is_none());
        assert!(Coordinate::new(-91.0, 0.0).is_none());
        assert!(Coordinate::new(0.0, -181.0).is_none());
    }

    #[test]
    fn origin_projects_to_origin() {
        let (x, y) = web_mercator_forward(0.0, 0.0);
        assert!(x.abs() < 1e-6);
        assert!(y.abs() < 1e-6);
    }
}
