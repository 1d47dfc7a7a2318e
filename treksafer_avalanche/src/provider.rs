use async_trait::async_trait;
use treksafer_common::Coordinate;
use treksafer_geoindex::ContainmentDistance;

use crate::types::ForecastData;

/// A single avalanche forecast source, covering one region. Mirrors the
/// abstract provider contract every concrete implementation (Canada, Quebec)
/// fulfills: where it covers, and how to fetch and parse its forecast.
#[async_trait]
pub trait AvalancheProvider: Send + Sync {
    fn name(&self) -> &str;

    /// `Contained` for an exact polygon match, `Nearby(km)` within the
    /// configured buffer, `OutOfRange` otherwise.
    fn distance_from_region(&self, point: &Coordinate) -> ContainmentDistance;

    fn out_of_range(&self, point: &Coordinate) -> bool {
        !self.distance_from_region(point).is_covered()
    }

    async fn get_forecast(&self, point: &Coordinate) -> Option<ForecastData>;

    fn forecast_cutoff_hour(&self) -> u32;
}
