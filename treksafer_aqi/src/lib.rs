//! Open-Meteo air-quality lookups. A single cached GET per request; any
//! failure collapses to "no AQI value" rather than propagating an error,
//! since the AQI line in a reply is always optional.

use chrono::Utc;
use serde::Deserialize;
use treksafer_common::Coordinate;
use treksafer_http::CachedHttp;

const AIR_QUALITY_URL: &str = "https://air-quality-api.open-meteo.com/v1/air-quality";

#[derive(Debug, Deserialize)]
struct AirQualityResponse {
    #[serde(default)]
    timezone: Option<String>,
    hourly: HourlyBlock,
}

#[derive(Debug, Deserialize)]
struct HourlyBlock {
    time: Vec<String>,
    us_aqi: Vec<Option<f64>>,
}

/// Fetch the current US AQI for `point`, matching the response's own hourly
/// series to the current hour in the timezone Open-Meteo resolved for that
/// location. Returns `None` on any network, parse, or lookup failure.
pub async fn current_us_aqi(point: &Coordinate, http: &CachedHttp) -> Option<i64> {
    let url = format!(
        "{AIR_QUALITY_URL}?latitude={}&longitude={}&hourly=us_aqi&timezone=auto&forecast_days=1",
        point.lat(),
        point.lon()
    );

    let body = match http.get_text(&url).await {
        Ok(body) => body,
        Err(error) => {
            tracing::warn!(url, %error, "aqi request failed");
            return None;
        }
    };

    let response: AirQualityResponse = match serde_json::from_str(&body) {
        Ok(response) => response,
        Err(error) => {
            tracing::warn!(url, %error, "aqi response was not valid json");
            return None;
        }
    };

    select_current_hour(&response)
}

fn select_current_hour(response: &AirQualityResponse) -> Option<i64> {
    let tz: chrono_tz::Tz = response.timezone.as_deref().and_then(|name| name.parse().ok()).unwrap_or(chrono_tz::UTC);
    let now = Utc::now().with_timezone(&tz);
    let current_hour_key = now.format("%Y-%m-%dT%H:00").to_string();

    let index = response.hourly.time.iter().position(|t| t == &current_hour_key)?;
    let value = response.hourly.us_aqi.get(index).copied().flatten()?;
    Some(value.round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_timezone_falls_back_to_utc() {
        let response = AirQualityResponse {
            timezone: None,
            hourly: HourlyBlock { time: vec![], us_aqi: vec![] },
        };
        assert!(select_current_hour(&response).is_none());
    }

    #[test]
    fn picks_value_matching_time_entry() {
        let response = AirQualityResponse {
            timezone: Some("UTC".to_string()),
            hourly: HourlyBlock {
                time: vec!["2099-01-01T00:00".to_string()],
                us_aqi: vec![Some(42.0)],
            },
        };
        // This entry will never match "now", confirming a mismatched hour yields None
        // rather than a stale reading from an unrelated index.
        assert!(select_current_hour(&response).is_none());
    }

    #[test]
    fn null_aqi_entry_is_treated_as_missing() {
        let response = AirQualityResponse {
            timezone: Some("UTC".to_string()),
            hourly: HourlyBlock {
                time: vec!["2024-01-01T00:00".to_string()],
                us_aqi: vec![None],
            },
        };
        assert!(select_current_hour(&response).is_none());
    }
}
