use lazy_static::lazy_static;
use regex::Regex;

use crate::types::{DataType, ForecastFilter, StatusFilter};

lazy_static! {
    static ref STATUS_RE: Regex =
        Regex::new(r"(?i)\b(active|managed|controlled|out|all)\b").unwrap();
    static ref DISTANCE_RE: Regex = Regex::new(r"(?i)\b(\d+(?:\.\d+)?)\s*(km|mi)\b").unwrap();
    static ref AVALANCHE_RE: Regex = Regex::new(r"(?i)\bavalanches?\b").unwrap();
    static ref FIRE_RE: Regex = Regex::new(r"(?i)\bfires?\b").unwrap();
    static ref FORECAST_RE: Regex = Regex::new(r"(?i)\b(current|today|tomorrow|all)\b").unwrap();
}

const MILES_TO_KM: f64 = 1.609344;

/// Every status keyword found is considered; `active` always wins over a
/// co-occurring `all` since the most urgent explicit filter takes priority.
pub fn extract_status(message: &str) -> Option<StatusFilter> {
    let mut found: Vec<StatusFilter> = STATUS_RE
        .captures_iter(message)
        .filter_map(|caps| StatusFilter::parse(&caps[1]))
        .collect();
    if found.is_empty() {
        return None;
    }
    if found.contains(&StatusFilter::Active) {
        return Some(StatusFilter::Active);
    }
    found.sort_by_key(|s| s.level().unwrap_or(u8::MAX));
    found.into_iter().next()
}

/// `<number><km|mi>`, miles converted to kilometers immediately so every
/// downstream consumer works in a single unit.
pub fn extract_distance_km(message: &str) -> Option<f64> {
    let caps = DISTANCE_RE.captures(message)?;
    let value: f64 = caps[1].parse().ok()?;
    match caps[2].to_ascii_lowercase().as_str() {
        "mi" => Some(value * MILES_TO_KM),
        _ => Some(value),
    }
}

/// `avalanche(s)` wins over `fire(s)` when both appear; absent either word
/// the caller falls back to auto-detection.
pub fn extract_data_type(message: &str) -> DataType {
    if AVALANCHE_RE.is_match(message) {
        DataType::Avalanche
    } else if FIRE_RE.is_match(message) {
        DataType::Fire
    } else {
        DataType::Auto
    }
}

/// Priority order when multiple forecast keywords appear: current, today,
/// tomorrow, all. Absent any keyword the router applies its own default.
pub fn extract_forecast(message: &str) -> Option<ForecastFilter> {
    let found: Vec<ForecastFilter> = FORECAST_RE
        .captures_iter(message)
        .filter_map(|caps| match caps[1].to_ascii_lowercase().as_str() {
            "current" => Some(ForecastFilter::Current),
            "today" => Some(ForecastFilter::Today),
            "tomorrow" => Some(ForecastFilter::Tomorrow),
            "all" => Some(ForecastFilter::All),
            _ => None,
        })
        .collect();

    for candidate in [
        ForecastFilter::Current,
        ForecastFilter::Today,
        ForecastFilter::Tomorrow,
        ForecastFilter::All,
    ] {
        if found.contains(&candidate) {
            return Some(candidate);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_wins_over_all() {
        let status = extract_status("show all active fires near me").unwrap();
        assert_eq!(status, StatusFilter::Active);
    }

    #[test]
    fn distance_in_miles_converts_to_km() {
        let km = extract_distance_km("fires within 10mi please").unwrap();
        assert!((km - 16.09344).abs() < 1e-5);
    }

    #[test]
    fn distance_in_km_passes_through() {
        let km = extract_distance_km("fires within 25km").unwrap();
        assert!((km - 25.0).abs() < 1e-9);
    }

    #[test]
    fn avalanche_keyword_detected() {
        assert_eq!(extract_data_type("any avalanche danger here?"), DataType::Avalanche);
    }

    #[test]
    fn fire_keyword_detected() {
        assert_eq!(extract_data_type("any fires nearby"), DataType::Fire);
    }

    #[test]
    fn no_keyword_is_auto() {
        assert_eq!(extract_data_type("50.1, -121.2"), DataType::Auto);
    }

    #[test]
    fn forecast_priority_prefers_current() {
        let forecast = extract_forecast("tomorrow or current conditions").unwrap();
        assert_eq!(forecast, ForecastFilter::Current);
    }
}
