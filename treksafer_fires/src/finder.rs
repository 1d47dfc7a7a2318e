use std::path::Path;
use std::sync::Arc;

use treksafer_common::Coordinate;
use treksafer_config::Settings;
use treksafer_geoindex::GeoIndex;
use treksafer_http::CachedHttp;
use treksafer_parser::StatusFilter;

use crate::{enrichment, filters, glob_select, normalize};
use crate::types::FireRecord;

const ISO_FIELD: &str = "ISO";
const POSTAL_FIELD: &str = "postal";

/// Outcome of a fire search: either the point is nowhere near any
/// configured data source, or it is and the (possibly empty, post-filter)
/// list of matches is returned.
#[derive(Debug)]
pub enum FireQuery {
    OutOfRange,
    Matches(Vec<FireRecord>),
}

pub struct FireFinder {
    settings: Arc<Settings>,
    geo: Arc<GeoIndex>,
    http: Arc<CachedHttp>,
}

impl FireFinder {
    pub fn new(settings: Arc<Settings>, geo: Arc<GeoIndex>, http: Arc<CachedHttp>) -> Self {
        FireFinder { settings, geo, http }
    }

    /// Run the full component C algorithm: source selection, per-row
    /// distance/bearing/normalization, enrichment, then the status/size
    /// filter pipeline in that fixed order.
    pub async fn find(&self, point: &Coordinate, status: StatusFilter, user_distance_km: Option<f64>, min_size_ha: f64) -> FireQuery {
        let max_radius = self.settings.max_radius;
        let search_radius_km = user_distance_km.map(|km| km.min(max_radius)).unwrap_or(self.settings.fire_radius);

        let countries_path = Path::new(&self.settings.shapefiles).join(&self.settings.boundaries.countries);
        let provinces_path = Path::new(&self.settings.shapefiles).join(&self.settings.boundaries.canada_provinces);
        let countries = self.geo.load(&countries_path);
        let provinces = self.geo.load(&provinces_path);

        let sources = treksafer_geoindex::sources_for(&countries, &provinces, point, max_radius, ISO_FIELD, POSTAL_FIELD);
        if sources.is_empty() {
            return FireQuery::OutOfRange;
        }

        let mut records = Vec::new();
        for data_source in &self.settings.data {
            if !sources.contains(&data_source.location) {
                continue;
            }
            let Some(perimeter_path) = glob_select::select_latest(Path::new(&self.settings.shapefiles), &data_source.location, &data_source.filename) else {
                continue;
            };
            let perimeter_set = self.geo.load(&perimeter_path);

            let limit_m = search_radius_km * 1000.0;
            for row in perimeter_set.rows() {
                let distance_m = row.distance_m(point);
                if distance_m > limit_m {
                    continue;
                }
                let mut record = normalize::normalize_row(row, &data_source.mapping, point, distance_m);
                if let Some(enrichment_config) = &data_source.enrichment {
                    enrichment::enrich(&mut record, enrichment_config, &data_source.mapping.transforms, &self.http).await;
                }
                records.push(record);
            }
        }

        let records = filters::apply_status(records, status);
        let records = filters::apply_size(records, min_size_ha);
        FireQuery::Matches(records)
    }
}
