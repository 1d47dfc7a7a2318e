use treksafer_common::Coordinate;
use treksafer_geoindex::ContainmentDistance;

use crate::provider::AvalancheProvider;

/// First exact-match provider wins immediately; otherwise the closest
/// provider within its own configured buffer wins. `providers` is iterated
/// in configuration order, which only matters for breaking exact-match ties.
pub fn select_provider<'a>(providers: &'a [Box<dyn AvalancheProvider>], point: &Coordinate) -> Option<&'a dyn AvalancheProvider> {
    let mut best: Option<(&dyn AvalancheProvider, f64)> = None;

    for provider in providers {
        match provider.distance_from_region(point) {
            ContainmentDistance::Contained => return Some(provider.as_ref()),
            ContainmentDistance::Nearby(km) => {
                if best.as_ref().map_or(true, |(_, best_km)| km < *best_km) {
                    best = Some((provider.as_ref(), km));
                }
            }
            ContainmentDistance::OutOfRange => {}
        }
    }

    best.map(|(provider, _)| provider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use treksafer_common::Coordinate;

    use crate::types::ForecastData;

    struct FixedProvider {
        label: &'static str,
        distance: ContainmentDistance,
    }

    #[async_trait]
    impl AvalancheProvider for FixedProvider {
        fn name(&self) -> &str {
            self.label
        }

        fn distance_from_region(&self, _point: &Coordinate) -> ContainmentDistance {
            self.distance
        }

        fn forecast_cutoff_hour(&self) -> u32 {
            16
        }

        async fn get_forecast(&self, _point: &Coordinate) -> Option<ForecastData> {
            None
        }
    }

    fn point() -> Coordinate {
        Coordinate::new(49.0, -122.0).unwrap()
    }

    #[test]
    fn exact_match_wins_even_if_listed_second() {
        let providers: Vec<Box<dyn AvalancheProvider>> = vec![
            Box::new(FixedProvider { label: "near", distance: ContainmentDistance::Nearby(2.0) }),
            Box::new(FixedProvider { label: "exact", distance: ContainmentDistance::Contained }),
        ];
        let selected = select_provider(&providers, &point()).unwrap();
        assert_eq!(selected.name(), "exact");
    }

    #[test]
    fn closest_within_buffer_wins_without_exact_match() {
        let providers: Vec<Box<dyn AvalancheProvider>> = vec![
            Box::new(FixedProvider { label: "far", distance: ContainmentDistance::Nearby(20.0) }),
            Box::new(FixedProvider { label: "near", distance: ContainmentDistance::Nearby(5.0) }),
        ];
        let selected = select_provider(&providers, &point()).unwrap();
        assert_eq!(selected.name(), "near");
    }

    #[test]
    fn nothing_qualifies_when_all_out_of_range() {
        let providers: Vec<Box<dyn AvalancheProvider>> = vec![Box::new(FixedProvider { label: "far", distance: ContainmentDistance::OutOfRange })];
        assert!(select_provider(&providers, &point()).is_none());
    }
}
