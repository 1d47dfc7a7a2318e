use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::Deserialize;
use treksafer_common::Coordinate;
use treksafer_geoindex::{ContainmentDistance, PerimeterSet};
use treksafer_http::CachedHttp;

use crate::provider::AvalancheProvider;
use crate::types::{AvalancheProblem, DayForecast, ForecastData};

const POSTAL_FIELD: &str = "postal";
const QUEBEC_POSTAL_CODE: &str = "QC";

/// Quebec's forecast area is a single province polygon pulled out of the
/// shared Canadian-provinces boundary layer, rather than its own subregion
/// shapefile.
pub struct QuebecProvider {
    lang: String,
    api_base: String,
    forecast_cutoff_hour: u32,
    buffer_km: f64,
    canada_provinces: Arc<PerimeterSet>,
    http: Arc<CachedHttp>,
}

impl QuebecProvider {
    pub fn new(api_base: String, lang: String, forecast_cutoff_hour: u32, buffer_km: f64, canada_provinces: Arc<PerimeterSet>, http: Arc<CachedHttp>) -> Self {
        QuebecProvider {
            lang,
            api_base,
            forecast_cutoff_hour,
            buffer_km,
            canada_provinces,
            http,
        }
    }

    fn quebec_row(&self) -> Option<&treksafer_geoindex::PerimeterRow> {
        self.canada_provinces.rows().iter().find(|row| row.attr(POSTAL_FIELD).and_then(|v| v.as_str()) == Some(QUEBEC_POSTAL_CODE))
    }
}

#[async_trait]
impl AvalancheProvider for QuebecProvider {
    fn name(&self) -> &str {
        "quebec"
    }

    fn distance_from_region(&self, point: &Coordinate) -> ContainmentDistance {
        let Some(row) = self.quebec_row() else {
            return ContainmentDistance::OutOfRange;
        };
        if row.contains(point) {
            return ContainmentDistance::Contained;
        }
        let km = row.distance_m(point) / 1000.0;
        if km <= self.buffer_km {
            ContainmentDistance::Nearby(km)
        } else {
            ContainmentDistance::OutOfRange
        }
    }

    fn forecast_cutoff_hour(&self) -> u32 {
        self.forecast_cutoff_hour
    }

    async fn get_forecast(&self, _point: &Coordinate) -> Option<ForecastData> {
        let url = self.api_base.replace("{lang}", &self.lang);

        let body = match self.http.get_text(&url).await {
            Ok(body) => body,
            Err(error) => {
                tracing::warn!(url, %error, "avalanche quebec request failed");
                return None;
            }
        };

        let response: QuebecResponse = match serde_json::from_str(&body) {
            Ok(response) => response,
            Err(error) => {
                tracing::warn!(url, %error, "avalanche quebec response was not valid json");
                return None;
            }
        };

        self.parse_forecast(response)
    }
}

impl QuebecProvider {
    fn parse_forecast(&self, response: QuebecResponse) -> Option<ForecastData> {
        if response.danger_ratings.is_empty() {
            tracing::warn!("avalanche quebec api returned empty danger ratings");
        }

        let mut forecasts = HashMap::new();
        for rating in &response.danger_ratings {
            let Ok(dt) = NaiveDateTime::parse_from_str(&rating.date.value, "%Y-%m-%dT%H:%M:%SZ") else {
                continue;
            };
            let date_str = dt.format("%Y-%m-%d").to_string();

            forecasts.insert(
                date_str,
                DayForecast {
                    alpine_rating: rating.ratings.get("alp").map(|r| r.rating.display.clone()).unwrap_or_else(|| "No Rating".to_string()),
                    treeline_rating: rating.ratings.get("tln").map(|r| r.rating.display.clone()).unwrap_or_else(|| "No Rating".to_string()),
                    below_treeline_rating: rating.ratings.get("btl").map(|r| r.rating.display.clone()).unwrap_or_else(|| "No Rating".to_string()),
                },
            );
        }

        // Quebec's feed only labels problem type; the rest of the problem's
        // fields come through as images rather than structured data.
        let problems = response
            .problems
            .into_iter()
            .map(|problem| AvalancheProblem {
                problem_type: problem.problem_type,
                ..Default::default()
            })
            .collect();

        Some(ForecastData {
            region: "Chic-Chocs".to_string(),
            date_issued: response.date_issued.unwrap_or_default(),
            timezone: "America/Toronto".to_string(),
            forecasts,
            problems,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuebecResponse {
    #[serde(default)]
    date_issued: Option<String>,
    #[serde(default)]
    danger_ratings: Vec<QuebecDangerRating>,
    #[serde(default)]
    problems: Vec<QuebecProblem>,
}

#[derive(Debug, Deserialize)]
struct QuebecDangerRating {
    date: QuebecDateValue,
    #[serde(default)]
    ratings: HashMap<String, QuebecBandRating>,
}

#[derive(Debug, Deserialize)]
struct QuebecDateValue {
    value: String,
}

#[derive(Debug, Deserialize)]
struct QuebecBandRating {
    rating: QuebecDisplay,
}

#[derive(Debug, Deserialize, Default)]
struct QuebecDisplay {
    #[serde(default)]
    display: String,
}

#[derive(Debug, Deserialize)]
struct QuebecProblem {
    #[serde(rename = "type", default)]
    problem_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_elevation_band_ratings() {
        let raw = r#"{
            "dateIssued": "2024-01-01",
            "dangerRatings": [
                {"date": {"value": "2024-01-02T00:00:00Z"}, "ratings": {"alp": {"rating": {"display": "High"}}}}
            ],
            "problems": [{"type": "Wind Slab"}]
        }"#;
        let response: QuebecResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.danger_ratings.len(), 1);
        assert_eq!(response.problems[0].problem_type, "Wind Slab");
    }
}
