//! Orchestrates a single inbound message end to end: parse, auto-detect
//! fire vs. avalanche when asked, dispatch to the matching subsystem, and
//! hand back the exact string a transport writes out.

use std::sync::Arc;

use treksafer_avalanche::{AvalancheProvider, AvalancheReport};
use treksafer_config::Settings;
use treksafer_fires::{FireFinder, FireQuery};
use treksafer_http::CachedHttp;
use treksafer_parser::{DataType, ForecastFilter, ParsedRequest, StatusFilter};
use treksafer_reply::ReplyError;

pub struct Router {
    settings: Arc<Settings>,
    fires: FireFinder,
    avalanche_providers: Vec<Box<dyn AvalancheProvider>>,
    http: Arc<CachedHttp>,
}

impl Router {
    pub fn new(settings: Arc<Settings>, fires: FireFinder, avalanche_providers: Vec<Box<dyn AvalancheProvider>>, http: Arc<CachedHttp>) -> Self {
        Router { settings, fires, avalanche_providers, http }
    }

    /// Run the full pipeline for one inbound message body and return the
    /// reply text, verbatim, for a transport to send back.
    pub async fn handle(&self, message: &str) -> String {
        let Some(request) = treksafer_parser::parse(message) else {
            tracing::warn!("no gps coordinates found in inbound message");
            return ReplyError::NoGps.message(self.settings.fire_radius);
        };

        match self.resolve_data_type(&request).await {
            DataType::Avalanche => self.handle_avalanche(&request).await,
            DataType::Fire | DataType::Auto => self.handle_fire(&request).await,
        }
    }

    /// `auto` probes the avalanche dispatcher once, short-circuited by the
    /// HTTP cache on any repeat lookup; a live forecast wins the route.
    async fn resolve_data_type(&self, request: &ParsedRequest) -> DataType {
        match request.data_type {
            DataType::Fire => DataType::Fire,
            DataType::Avalanche => DataType::Avalanche,
            DataType::Auto => {
                let probe = AvalancheReport::new(&self.avalanche_providers, request.coords);
                if probe.has_data().await {
                    DataType::Avalanche
                } else {
                    DataType::Fire
                }
            }
        }
    }

    async fn handle_fire(&self, request: &ParsedRequest) -> String {
        let status = request.status.unwrap_or_else(|| StatusFilter::parse(&self.settings.fire_status).unwrap_or(StatusFilter::default_filter()));
        let effective_radius = request.distance_km.map(|km| km.min(self.settings.max_radius)).unwrap_or(self.settings.fire_radius);

        let query = self.fires.find(&request.coords, status, request.distance_km, self.settings.fire_size).await;

        match query {
            FireQuery::OutOfRange => ReplyError::OutsideOfArea.message(self.settings.fire_radius),
            FireQuery::Matches(records) if records.is_empty() => ReplyError::NoFires.message(effective_radius),
            FireQuery::Matches(records) => {
                let body = treksafer_reply::format_fires(&records);
                self.prefix_aqi(&request.coords, body).await
            }
        }
    }

    async fn prefix_aqi(&self, point: &treksafer_common::Coordinate, body: String) -> String {
        if !self.settings.include_aqi {
            return body;
        }
        match treksafer_aqi::current_us_aqi(point, &self.http).await {
            Some(aqi) => format!("{}\n{body}", treksafer_reply::aqi_line(aqi)),
            None => body,
        }
    }

    async fn handle_avalanche(&self, request: &ParsedRequest) -> String {
        let report = AvalancheReport::new(&self.avalanche_providers, request.coords);
        if report.out_of_range() {
            return ReplyError::AvalancheUnavailable.message(self.settings.fire_radius);
        }
        let filter = request.forecast.unwrap_or(ForecastFilter::default_filter());
        report.get_forecast(filter).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_SETTINGS: &str = r#"
avalanche:
  providers: {}
data:
  - location: "us"
    filename: "*.shp"
    mapping:
      fields:
        Name: "FIRE_NAME"
        Size: "ACRES"
"#;

    fn router_with(cache_dir: &str) -> Router {
        let settings: Settings = serde_yaml::from_str(MINIMAL_SETTINGS).unwrap();
        let settings = Arc::new(settings);
        let http = Arc::new(CachedHttp::new(std::env::temp_dir().join(cache_dir), std::time::Duration::from_secs(60), std::time::Duration::from_secs(5)));
        let geo = Arc::new(treksafer_geoindex::GeoIndex::new(4));
        let fires = FireFinder::new(Arc::clone(&settings), geo, Arc::clone(&http));
        Router::new(settings, fires, Vec::new(), http)
    }

    #[tokio::test]
    async fn unparseable_message_yields_no_gps_error() {
        let router = router_with("treksafer-router-test-cache-1");
        let reply = router.handle("no coordinates in this message at all").await;
        assert!(reply.starts_with("TrekSafer ERROR: No GPS location found"));
    }

    #[tokio::test]
    async fn avalanche_query_with_no_providers_reports_unavailable() {
        let router = router_with("treksafer-router-test-cache-2");
        let reply = router.handle("49.123, -123.456 avalanche").await;
        assert!(reply.contains("outside of supported avalanche forecast area"));
    }
}
