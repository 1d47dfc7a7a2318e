use std::collections::HashMap;

use serde::Deserialize;

/// One elevation band's danger rating for one forecast date.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DayForecast {
    pub alpine_rating: String,
    pub treeline_rating: String,
    pub below_treeline_rating: String,
}

/// One avalanche problem entry. Canada fills every field; Quebec's feed only
/// carries `problem_type`, so the rest are left at their empty defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AvalancheProblem {
    pub problem_type: String,
    pub elevations: Vec<String>,
    pub aspects: Vec<String>,
    pub likelihood: String,
    pub size_min: String,
    pub size_max: String,
}

/// A provider's full forecast payload: every date it published a rating for,
/// plus the problems that apply across all of them. The date filter narrows
/// `forecasts` down to what the reply actually shows.
#[derive(Debug, Clone)]
pub struct ForecastData {
    pub region: String,
    pub date_issued: String,
    pub timezone: String,
    pub forecasts: HashMap<String, DayForecast>,
    pub problems: Vec<AvalancheProblem>,
}
