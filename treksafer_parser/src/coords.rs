use lazy_static::lazy_static;
use regex::Regex;
use treksafer_common::Coordinate;

const LAT: &str = r"-?\d{1,2}(?:\.\d{1,8})?";
const LON: &str = r"-?\d{1,3}(?:\.\d{1,8})?";

lazy_static! {
    static ref TRAILING_BRACKET_RE: Regex =
        Regex::new(&format!(r"\(\s*({LAT})\s*,\s*({LON})\s*\)\s*$")).unwrap();
    static ref BARE_PAIR_RE: Regex = Regex::new(&format!(r"\b({LAT})\s*,\s*({LON})\b")).unwrap();
    static ref DEG_HEMI_LATLON_RE: Regex = Regex::new(&format!(
        r"(?i)(?P<lat>{LAT})\s*[°º]?\s*(?P<lat_dir>[NS])\s*[,;]?\s*(?P<lon>{LON})\s*[°º]?\s*(?P<lon_dir>[EW])"
    ))
    .unwrap();
    static ref DEG_HEMI_DIRLAT_RE: Regex = Regex::new(&format!(
        r"(?i)(?P<lat_dir>[NS])\s*(?P<lat>{LAT})\s*[°º]?\s*[,;]?\s*(?P<lon_dir>[EW])\s*(?P<lon>{LON})\s*[°º]?"
    ))
    .unwrap();
}

/// inReach devices append `(lat, lon)` at the very end of the message;
/// whitespace and newlines are tolerated around the comma and brackets.
pub fn trailing_bracketed_pair(message: &str) -> Option<Coordinate> {
    let caps = TRAILING_BRACKET_RE.captures(message)?;
    let lat: f64 = caps[1].parse().ok()?;
    let lon: f64 = caps[2].parse().ok()?;
    Coordinate::new(lat, lon)
}

/// First `lat, lon` pair anywhere in the message whose values pass bounds
/// validation; a pair that fails validation does not stop the scan.
pub fn bracket_or_bare_pair(message: &str) -> Option<Coordinate> {
    for caps in BARE_PAIR_RE.captures_iter(message) {
        let lat: f64 = caps[1].parse().ok()?;
        let lon: f64 = caps[2].parse().ok()?;
        if let Some(coord) = Coordinate::new(lat, lon) {
            return Some(coord);
        }
    }
    None
}

/// `<num>[°]? [NS] [,;]? <num>[°]? [EW]` or the direction-first variant;
/// the hemisphere letter determines sign and overrides any leading minus.
pub fn degree_hemisphere_pair(message: &str) -> Option<Coordinate> {
    for re in [&*DEG_HEMI_LATLON_RE, &*DEG_HEMI_DIRLAT_RE] {
        if let Some(caps) = re.captures(message) {
            let lat_val: f64 = caps["lat"].parse().ok()?;
            let lon_val: f64 = caps["lon"].parse().ok()?;
            let lat_dir = &caps["lat_dir"];
            let lon_dir = &caps["lon_dir"];

            let lat = apply_hemisphere(lat_val, lat_dir, true);
            let lon = apply_hemisphere(lon_val, lon_dir, false);

            if let Some(coord) = Coordinate::new(lat, lon) {
                return Some(coord);
            }
        }
    }
    None
}

fn apply_hemisphere(value: f64, hemisphere: &str, is_lat: bool) -> f64 {
    let magnitude = value.abs();
    let upper = hemisphere.to_ascii_uppercase();
    if is_lat {
        if upper == "N" {
            magnitude
        } else {
            -magnitude
        }
    } else if upper == "W" {
        -magnitude
    } else {
        magnitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_bracket_with_whitespace() {
        let msg = "Fire check inreachlink.com/ABC (50.7021714, -121.9725246)";
        let coord = trailing_bracketed_pair(msg).unwrap();
        assert!((coord.lat() - 50.7021714).abs() < 1e-6);
    }

    #[test]
    fn trailing_bracket_requires_end_of_string() {
        let msg = "(50.7, -121.9) some trailing text";
        assert!(trailing_bracketed_pair(msg).is_none());
    }

    #[test]
    fn bare_pair_skips_out_of_range_candidates() {
        let msg = "200, 300 but actually (49.1, -121.0) is the spot";
        let coord = bracket_or_bare_pair(msg).unwrap();
        assert!((coord.lat() - 49.1).abs() < 1e-9);
    }

    #[test]
    fn degree_hemisphere_latlon_form() {
        let msg = "50.58225° N, 122.09114° W";
        let coord = degree_hemisphere_pair(msg).unwrap();
        assert!((coord.lat() - 50.58225).abs() < 1e-6);
        assert!((coord.lon() - -122.09114).abs() < 1e-6);
    }

    #[test]
    fn degree_hemisphere_dirlat_form() {
        let msg = "N 50.58225, W 122.09114";
        let coord = degree_hemisphere_pair(msg).unwrap();
        assert!((coord.lat() - 50.58225).abs() < 1e-6);
        assert!((coord.lon() - -122.09114).abs() < 1e-6);
    }

    #[test]
    fn hemisphere_overrides_leading_minus() {
        let msg = "-50.0 N, 122.0 W";
        let coord = degree_hemisphere_pair(msg).unwrap();
        assert!((coord.lat() - 50.0).abs() < 1e-9);
    }
}
