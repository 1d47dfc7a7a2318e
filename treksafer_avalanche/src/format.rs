use chrono::{Duration, NaiveDate, Timelike, Utc};
use chrono_tz::Tz;
use treksafer_parser::ForecastFilter;

use crate::types::{AvalancheProblem, ForecastData};

/// Which calendar dates a `ForecastFilter` selects, evaluated against the
/// provider's own timezone and cutoff hour rather than the server's clock.
pub fn dates_for_filter(forecast: &ForecastData, filter: ForecastFilter, cutoff_hour: u32) -> Vec<NaiveDate> {
    let tz: Tz = forecast.timezone.parse().unwrap_or(chrono_tz::America::Vancouver);
    let now = Utc::now().with_timezone(&tz);

    match filter {
        ForecastFilter::Current => {
            if now.hour() >= cutoff_hour {
                vec![(now + Duration::days(1)).date_naive()]
            } else {
                vec![now.date_naive()]
            }
        }
        ForecastFilter::Today => vec![now.date_naive()],
        ForecastFilter::Tomorrow => vec![(now + Duration::days(1)).date_naive()],
        ForecastFilter::All => {
            let mut dates: Vec<NaiveDate> = forecast.forecasts.keys().filter_map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()).collect();
            dates.sort();
            dates
        }
    }
}

/// Render the selected dates' danger ratings, then the problems list once
/// at the end -- the exact section order a reply's avalanche block follows.
pub fn format_forecast(forecast: &ForecastData, dates: &[NaiveDate]) -> String {
    let mut parts = vec![format!("Avalanche Forecast: {}", forecast.region)];

    if dates.len() == 1 {
        parts.push(format!("Date: {}", dates[0].format("%Y-%m-%d")));
    } else {
        parts.push(format!("Issued: {}", forecast.date_issued));
    }
    parts.push(String::new());

    let multi = dates.len() > 1;
    let indent = if multi { "    " } else { "  " };

    for date in dates {
        let date_str = date.format("%Y-%m-%d").to_string();
        let Some(day) = forecast.forecasts.get(&date_str) else {
            continue;
        };

        if multi {
            parts.push(format!("Date: {date_str}"));
        }
        parts.push("Danger Ratings:".to_string());
        parts.push(format!("{indent}Alpine: {}", day.alpine_rating));
        parts.push(format!("{indent}Treeline: {}", day.treeline_rating));
        parts.push(format!("{indent}Below Treeline: {}", day.below_treeline_rating));
        parts.push(String::new());
    }

    if !forecast.problems.is_empty() {
        parts.extend(format_problems(&forecast.problems));
    }

    parts.join("\n")
}

fn format_problems(problems: &[AvalancheProblem]) -> Vec<String> {
    let indent = "  ";
    let mut parts = vec!["Problems:".to_string()];

    for problem in problems {
        parts.push(format!("{indent}\u{2022} {}", problem.problem_type));

        if !problem.elevations.is_empty() {
            parts.push(format!("{indent}  Elevations: {}", problem.elevations.join(", ")));
        }
        if !problem.aspects.is_empty() {
            parts.push(format!("{indent}  Aspects: {}", problem.aspects.join(", ")));
        }
        if !problem.likelihood.is_empty() && !problem.size_min.is_empty() {
            parts.push(format!("{indent}  {}, Size {}-{}", problem.likelihood, problem.size_min, problem.size_max));
        }
    }

    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn sample_forecast() -> ForecastData {
        let mut forecasts = HashMap::new();
        forecasts.insert(
            "2024-01-02".to_string(),
            crate::types::DayForecast {
                alpine_rating: "Considerable".to_string(),
                treeline_rating: "Moderate".to_string(),
                below_treeline_rating: "Low".to_string(),
            },
        );
        ForecastData {
            region: "South Coast".to_string(),
            date_issued: "2024-01-01T12:00:00Z".to_string(),
            timezone: "America/Vancouver".to_string(),
            forecasts,
            problems: vec![AvalancheProblem {
                problem_type: "Wind Slab".to_string(),
                elevations: vec!["Alpine".to_string()],
                aspects: vec!["N".to_string()],
                likelihood: "Likely".to_string(),
                size_min: "1".to_string(),
                size_max: "2".to_string(),
            }],
        }
    }

    #[test]
    fn single_date_format_includes_date_header_and_problems() {
        let forecast = sample_forecast();
        let dates = vec![NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()];
        let rendered = format_forecast(&forecast, &dates);
        assert!(rendered.contains("Avalanche Forecast: South Coast"));
        assert!(rendered.contains("Date: 2024-01-02"));
        assert!(rendered.contains("Alpine: Considerable"));
        assert!(rendered.contains("Problems:"));
        assert!(rendered.contains("Wind Slab"));
    }

    #[test]
    fn all_filter_sorts_available_dates() {
        let mut forecast = sample_forecast();
        forecast.forecasts.insert(
            "2024-01-01".to_string(),
            crate::types::DayForecast::default(),
        );
        let dates = dates_for_filter(&forecast, ForecastFilter::All, 16);
        assert_eq!(dates, vec![NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()]);
    }
}
