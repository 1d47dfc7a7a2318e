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

const SUBREGION_NAME_FIELD: &str = "polygon_na";

pub struct CanadaProvider {
    lang: String,
    api_base: String,
    forecast_cutoff_hour: u32,
    buffer_km: f64,
    subregions: Arc<PerimeterSet>,
    http: Arc<CachedHttp>,
}

impl CanadaProvider {
    pub fn new(api_base: String, lang: String, forecast_cutoff_hour: u32, buffer_km: f64, subregions: Arc<PerimeterSet>, http: Arc<CachedHttp>) -> Self {
        CanadaProvider {
            lang,
            api_base,
            forecast_cutoff_hour,
            buffer_km,
            subregions,
            http,
        }
    }

    fn subregion_name(&self, point: &Coordinate) -> Option<String> {
        treksafer_geoindex::cover_or_nearest(&self.subregions, point, self.buffer_km, SUBREGION_NAME_FIELD).map(str::to_string)
    }
}

#[async_trait]
impl AvalancheProvider for CanadaProvider {
    fn name(&self) -> &str {
        "canada"
    }

    fn distance_from_region(&self, point: &Coordinate) -> ContainmentDistance {
        treksafer_geoindex::distance_from_region(&self.subregions, point, self.buffer_km)
    }

    fn forecast_cutoff_hour(&self) -> u32 {
        self.forecast_cutoff_hour
    }

    async fn get_forecast(&self, point: &Coordinate) -> Option<ForecastData> {
        let base = self.api_base.replace("{lang}", &self.lang);
        let url = format!("{base}?lat={}&long={}", point.lat(), point.lon());

        let body = match self.http.get_text(&url).await {
            Ok(body) => body,
            Err(error) => {
                tracing::warn!(url, %error, "avalanche canada request failed");
                return None;
            }
        };

        let response: CanadaResponse = match serde_json::from_str(&body) {
            Ok(response) => response,
            Err(error) => {
                tracing::warn!(url, %error, "avalanche canada response was not valid json");
                return None;
            }
        };

        self.parse_forecast(response, point)
    }
}

impl CanadaProvider {
    fn parse_forecast(&self, response: CanadaResponse, point: &Coordinate) -> Option<ForecastData> {
        let report = response.report?;
        if report.id.as_deref().unwrap_or("").is_empty() {
            return None;
        }

        let region = self.subregion_name(point).unwrap_or_else(|| report.title.clone().unwrap_or_else(|| "Unknown".to_string()));

        if report.danger_ratings.is_empty() {
            tracing::warn!(lat = point.lat(), lon = point.lon(), "avalanche canada api returned empty danger ratings");
        }

        let mut forecasts = HashMap::new();
        for rating in &report.danger_ratings {
            let Ok(dt) = NaiveDateTime::parse_from_str(&rating.date.value, "%Y-%m-%dT%H:%M:%SZ") else {
                continue;
            };
            let date_str = dt.format("%Y-%m-%d").to_string();

            let alpine = rating.ratings.get("alp").map(|r| r.rating.display.clone()).unwrap_or_else(|| "No Rating".to_string());
            let treeline = rating.ratings.get("tln").map(|r| r.rating.display.clone()).unwrap_or_else(|| "No Rating".to_string());
            let below_treeline = rating.ratings.get("btl").map(|r| r.rating.display.clone()).unwrap_or_else(|| "No Rating".to_string());

            for key in rating.ratings.keys() {
                if !matches!(key.as_str(), "alp" | "tln" | "btl") {
                    tracing::warn!(band = key, "invalid avalanche band found in api response");
                }
            }

            forecasts.insert(
                date_str,
                DayForecast {
                    alpine_rating: alpine,
                    treeline_rating: treeline,
                    below_treeline_rating: below_treeline,
                },
            );
        }

        let problems = report
            .problems
            .into_iter()
            .map(|problem| AvalancheProblem {
                problem_type: problem.problem_type.display,
                elevations: problem.data.elevations.into_iter().map(|e| e.display).collect(),
                aspects: problem.data.aspects.into_iter().map(|a| a.value).collect(),
                likelihood: problem.data.likelihood.display,
                size_min: problem.data.expected_size.min,
                size_max: problem.data.expected_size.max,
            })
            .collect();

        Some(ForecastData {
            region,
            date_issued: report.date_issued.unwrap_or_default(),
            timezone: report.timezone.unwrap_or_else(|| "America/Vancouver".to_string()),
            forecasts,
            problems,
        })
    }
}

#[derive(Debug, Deserialize)]
struct CanadaResponse {
    report: Option<CanadaReport>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CanadaReport {
    id: Option<String>,
    #[serde(default)]
    timezone: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    date_issued: Option<String>,
    #[serde(default)]
    danger_ratings: Vec<CanadaDangerRating>,
    #[serde(default)]
    problems: Vec<CanadaProblem>,
}

#[derive(Debug, Deserialize)]
struct CanadaDangerRating {
    date: CanadaDateValue,
    #[serde(default)]
    ratings: HashMap<String, CanadaBandRating>,
}

#[derive(Debug, Deserialize)]
struct CanadaDateValue {
    value: String,
}

#[derive(Debug, Deserialize)]
struct CanadaBandRating {
    rating: CanadaDisplay,
}

#[derive(Debug, Deserialize)]
struct CanadaDisplay {
    #[serde(default)]
    display: String,
}

#[derive(Debug, Deserialize)]
struct CanadaProblem {
    #[serde(rename = "type")]
    problem_type: CanadaDisplay,
    #[serde(default)]
    data: CanadaProblemData,
}

#[derive(Debug, Default, Deserialize)]
struct CanadaProblemData {
    #[serde(default)]
    elevations: Vec<CanadaDisplay>,
    #[serde(default)]
    aspects: Vec<CanadaValue>,
    #[serde(default)]
    likelihood: CanadaDisplay,
    #[serde(default)]
    expected_size: CanadaSizeRange,
}

#[derive(Debug, Deserialize)]
struct CanadaValue {
    #[serde(default)]
    value: String,
}

#[derive(Debug, Default, Deserialize)]
struct CanadaSizeRange {
    #[serde(default)]
    min: String,
    #[serde(default)]
    max: String,
}

impl Default for CanadaDisplay {
    fn default() -> Self {
        CanadaDisplay { display: String::new() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_danger_ratings_and_problems() {
        let raw = r#"{
            "report": {
                "id": "fc-1",
                "timezone": "America/Vancouver",
                "title": "South Coast",
                "dateIssued": "2024-01-01T12:00:00Z",
                "dangerRatings": [
                    {"date": {"value": "2024-01-02T00:00:00Z"}, "ratings": {"alp": {"rating": {"display": "Considerable"}}, "tln": {"rating": {"display": "Moderate"}}, "btl": {"rating": {"display": "Low"}}}}
                ],
                "problems": [
                    {"type": {"display": "Wind Slab"}, "data": {"elevations": [{"display": "Alpine"}], "aspects": [{"value": "N"}], "likelihood": {"display": "Likely"}, "expectedSize": {"min": "1", "max": "2"}}}
                ]
            }
        }"#;
        let response: CanadaResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.report.as_ref().unwrap().danger_ratings.len(), 1);
        assert_eq!(response.report.unwrap().problems[0].problem_type.display, "Wind Slab");
    }
}
