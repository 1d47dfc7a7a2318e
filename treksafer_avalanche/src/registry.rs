use std::path::Path;
use std::sync::Arc;

use treksafer_config::Settings;
use treksafer_geoindex::GeoIndex;
use treksafer_http::CachedHttp;

use crate::canada::CanadaProvider;
use crate::provider::AvalancheProvider;
use crate::quebec::QuebecProvider;

/// Build every configured avalanche provider, in the order `settings.avalanche.providers`
/// iterates -- insertion order from the YAML map, since [`Settings`] keeps it in an
/// `IndexMap` keyed by provider name rather than a `HashMap`.
pub fn build_providers(settings: &Settings, geo: &Arc<GeoIndex>, http: &Arc<CachedHttp>) -> Vec<Box<dyn AvalancheProvider>> {
    let shapefiles = Path::new(&settings.shapefiles);
    let subregions_path = shapefiles.join(&settings.boundaries.canadian_subregions);
    let provinces_path = shapefiles.join(&settings.boundaries.canada_provinces);
    let buffer_km = settings.avalanche.distance_buffer;

    let mut providers: Vec<Box<dyn AvalancheProvider>> = Vec::new();

    for (region_code, config) in &settings.avalanche.providers {
        let provider: Box<dyn AvalancheProvider> = match config.provider.as_str() {
            "canada" => {
                let subregions = geo.load(&subregions_path);
                Box::new(CanadaProvider::new(config.api_base.clone(), config.lang.clone(), config.forecast_cutoff_hour, buffer_km, subregions, Arc::clone(http)))
            }
            "quebec" => {
                let provinces = geo.load(&provinces_path);
                Box::new(QuebecProvider::new(config.api_base.clone(), config.lang.clone(), config.forecast_cutoff_hour, buffer_km, provinces, Arc::clone(http)))
            }
            other => {
                tracing::warn!(region = region_code, provider = other, "unknown avalanche provider type in configuration, skipping");
                continue;
            }
        };
        providers.push(provider);
    }

    providers
}
