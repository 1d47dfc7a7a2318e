//! Freeform message parsing: pull a coordinate and optional filter
//! directives out of whatever text a satellite messenger happens to send.

pub mod coords;
pub mod filters;
pub mod types;
pub mod url_scan;

pub use types::{DataType, ForecastFilter, ParsedRequest, StatusFilter};

/// Tries, in order, a Maps share-link scan, a trailing bracketed pair, any
/// bracket-or-bare decimal pair, then degree+hemisphere forms. The first
/// extraction step that yields an in-range coordinate wins; none succeeding
/// means the message carries no usable location.
pub fn parse(message: &str) -> Option<ParsedRequest> {
    let coords = url_scan::scan_urls(message)
        .or_else(|| coords::trailing_bracketed_pair(message))
        .or_else(|| coords::bracket_or_bare_pair(message))
        .or_else(|| coords::degree_hemisphere_pair(message))?;

    Some(ParsedRequest {
        coords,
        status: filters::extract_status(message),
        distance_km: filters::extract_distance_km(message),
        data_type: filters::extract_data_type(message),
        forecast: filters::extract_forecast(message),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_coordinates_yields_none() {
        assert!(parse("are there any fires near town").is_none());
    }

    #[test]
    fn trailing_bracket_takes_priority_over_bare_pair_scan() {
        let msg = "10, 10 but really (49.123, -123.456)";
        let request = parse(msg).unwrap();
        assert!((request.coords.lon() - -123.456).abs() < 1e-9);
    }

    #[test]
    fn full_message_combines_coordinate_and_filters() {
        let msg = "49.123, -123.456 active fires within 25km";
        let request = parse(msg).unwrap();
        assert_eq!(request.status, Some(StatusFilter::Active));
        assert_eq!(request.data_type, DataType::Fire);
        assert!((request.distance_km.unwrap() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn url_scan_wins_when_message_also_has_a_bare_pair() {
        let msg = "https://maps.apple.com/?coordinate=49.1,-123.1 also 1,1";
        let request = parse(msg).unwrap();
        assert!((request.coords.lat() - 49.1).abs() < 1e-9);
    }
}
