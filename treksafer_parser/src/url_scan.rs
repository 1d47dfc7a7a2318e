use lazy_static::lazy_static;
use regex::Regex;
use treksafer_common::Coordinate;
use url::Url;

lazy_static! {
    static ref URL_TOKEN_RE: Regex = Regex::new(r"https?://\S+").unwrap();
    static ref GOOGLE_AT_RE: Regex = Regex::new(r"@(-?\d{1,2}(?:\.\d+)?),(-?\d{1,3}(?:\.\d+)?)").unwrap();
}

/// Apple Maps / Google Maps share links, first match wins -- the same
/// priority order a message's coordinate extraction tries before falling
/// back to bare decimal pairs.
pub fn scan_urls(message: &str) -> Option<Coordinate> {
    for token in URL_TOKEN_RE.find_iter(message) {
        let Ok(url) = Url::parse(token.as_str()) else {
            continue;
        };
        let host = url.host_str().unwrap_or("");

        let coords = if host.contains("maps.apple.com") {
            from_apple(&url)
        } else if (host.contains("google.") || host.contains("goo.gl")) && url.path().contains("/maps") {
            from_google(&url)
        } else {
            None
        };

        if coords.is_some() {
            return coords;
        }
    }
    None
}

fn query_param<'a>(url: &'a Url, key: &str) -> Option<String> {
    url.query_pairs().find(|(k, _)| k == key).map(|(_, v)| v.into_owned())
}

fn from_apple(url: &Url) -> Option<Coordinate> {
    let raw = query_param(url, "coordinate")?;
    let (lat_s, lon_s) = raw.split_once(',')?;
    let lat: f64 = lat_s.trim().parse().ok()?;
    let lon: f64 = lon_s.trim().parse().ok()?;
    Coordinate::new(lat, lon)
}

fn from_google(url: &Url) -> Option<Coordinate> {
    if let Some(caps) = GOOGLE_AT_RE.captures(url.path()) {
        let lat: f64 = caps[1].parse().ok()?;
        let lon: f64 = caps[2].parse().ok()?;
        if let Some(coord) = Coordinate::new(lat, lon) {
            return Some(coord);
        }
    }

    for key in ["q", "query"] {
        if let Some(value) = query_param(url, key) {
            let trimmed = value.trim();
            if let Some((lat_s, lon_s)) = trimmed.split_once(',') {
                if let (Ok(lat), Ok(lon)) = (lat_s.trim().parse::<f64>(), lon_s.trim().parse::<f64>()) {
                    if let Some(coord) = Coordinate::new(lat, lon) {
                        return Some(coord);
                    }
                }
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apple_maps_link_parses() {
        let msg = "check this out https://maps.apple.com/?coordinate=49.123,-123.456&z=16";
        let coord = scan_urls(msg).unwrap();
        assert!((coord.lat() - 49.123).abs() < 1e-9);
        assert!((coord.lon() - -123.456).abs() < 1e-9);
    }

    #[test]
    fn google_maps_at_form_parses() {
        let msg = "https://www.google.com/maps/@49.123,-123.456,15z";
        let coord = scan_urls(msg).unwrap();
        assert!((coord.lat() - 49.123).abs() < 1e-9);
    }

    #[test]
    fn google_maps_query_form_parses() {
        let msg = "https://www.google.com/maps?q=49.123,-123.456";
        let coord = scan_urls(msg).unwrap();
        assert!((coord.lon() - -123.456).abs() < 1e-9);
    }

    #[test]
    fn non_maps_url_is_ignored() {
        let msg = "see https://example.com/page?coordinate=49.123,-123.456";
        assert!(scan_urls(msg).is_none());
    }
}
