use treksafer_common::Coordinate;
use treksafer_parser::ForecastFilter;

use crate::format::{dates_for_filter, format_forecast};
use crate::provider::AvalancheProvider;
use crate::selection::select_provider;

/// One resolved avalanche lookup: the provider selection has already
/// happened, so every method here answers for this specific point.
pub struct AvalancheReport<'a> {
    point: Coordinate,
    provider: Option<&'a dyn AvalancheProvider>,
}

impl<'a> AvalancheReport<'a> {
    pub fn new(providers: &'a [Box<dyn AvalancheProvider>], point: Coordinate) -> Self {
        AvalancheReport {
            point,
            provider: select_provider(providers, &point),
        }
    }

    pub fn out_of_range(&self) -> bool {
        match self.provider {
            Some(provider) => provider.out_of_range(&self.point),
            None => true,
        }
    }

    /// Used by the router's auto-detection: does this point have a live
    /// avalanche provider with actual forecast data right now?
    pub async fn has_data(&self) -> bool {
        match self.provider {
            Some(provider) => provider.get_forecast(&self.point).await.is_some(),
            None => false,
        }
    }

    /// A formatted forecast, or one of two fixed English fallback messages
    /// when no provider covers this point or the provider's call came back
    /// empty -- this mirrors the router's other reply paths, which always
    /// get a renderable string rather than an error to propagate.
    pub async fn get_forecast(&self, filter: ForecastFilter) -> String {
        let Some(provider) = self.provider else {
            return "Avalanche forecasts not available for this location.".to_string();
        };

        let Some(forecast) = provider.get_forecast(&self.point).await else {
            return "No avalanche forecast available for this location.".to_string();
        };

        let dates = dates_for_filter(&forecast, filter, provider.forecast_cutoff_hour());
        format_forecast(&forecast, &dates)
    }
}
