use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::path::Path;

use geo::{Contains, Distance, Euclidean};

use crate::attribute::AttributeValue;
use crate::errors::{GeoIndexError, Result};
use crate::polygon::shape_to_multi_polygon;
use treksafer_common::Coordinate;

/// One polygon plus its dbase attribute row, both already projected /
/// collected into our own types so nothing downstream touches the
/// `shapefile` or `geo` crates directly.
#[derive(Debug, Clone)]
pub struct PerimeterRow {
    pub polygon: geo::MultiPolygon<f64>,
    pub attributes: HashMap<String, AttributeValue>,
}

impl PerimeterRow {
    pub fn attr(&self, field: &str) -> Option<&AttributeValue> {
        self.attributes.get(field)
    }

    pub fn contains(&self, point: &Coordinate) -> bool {
        let projected = geo::Point::from(point.to_web_mercator());
        self.polygon.contains(&projected)
    }

    /// Distance in meters from `point` to this polygon's boundary, 0.0 if
    /// `point` is inside.
    pub fn distance_m(&self, point: &Coordinate) -> f64 {
        let projected = geo::Point::from(point.to_web_mercator());
        Euclidean.distance(&self.polygon, &projected)
    }

    /// The closest point on this polygon's boundary to `point`, in WGS84
    /// degrees, used to compute a compass bearing for the reply.
    pub fn closest_point(&self, point: &Coordinate) -> Option<Coordinate> {
        use geo::algorithm::closest_point::ClosestPoint;
        let projected = geo::Point::from(point.to_web_mercator());
        let closest = self
            .polygon
            .0
            .iter()
            .map(|poly| poly.exterior().closest_point(&projected))
            .filter_map(|c| match c {
                geo::Closest::Intersection(p) | geo::Closest::SinglePoint(p) => Some(p),
                geo::Closest::Indeterminate => None,
            })
            .min_by(|a, b| {
                Euclidean.distance(a, &projected)
                    .partial_cmp(&Euclidean.distance(b, &projected))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })?;
        let (lon, lat) = treksafer_common::coord::web_mercator_inverse(closest.x(), closest.y());
        Coordinate::new(lat, lon)
    }
}

/// A loaded, projected polygon collection -- either a fixed boundary layer
/// (countries, provinces, avalanche subregions) or a daily fire-perimeter
/// shapefile. Always non-empty unless the source failed to load, in which
/// case callers get [`PerimeterSet::empty`] and every query degrades
/// gracefully rather than erroring.
#[derive(Debug, Clone, Default)]
pub struct PerimeterSet {
    rows: Vec<PerimeterRow>,
}

impl PerimeterSet {
    pub fn empty() -> Self {
        PerimeterSet { rows: Vec::new() }
    }

    pub fn rows(&self) -> &[PerimeterRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First row containing `point`, if any.
    pub fn containing(&self, point: &Coordinate) -> Option<&PerimeterRow> {
        self.rows.iter().find(|row| row.contains(point))
    }

    /// The row nearest `point` and its distance in km, if any row lies
    /// within `buffer_km`. Containment (distance 0) always wins ties.
    pub fn nearest_within(&self, point: &Coordinate, buffer_km: f64) -> Option<(&PerimeterRow, f64)> {
        self.rows
            .iter()
            .map(|row| (row, row.distance_m(point) / 1000.0))
            .filter(|(_, km)| *km <= buffer_km)
            .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    }

    /// Load a zipped ESRI shapefile (.shp/.shx/.dbf bundled in a .zip) from
    /// disk, projecting every polygon to EPSG:3857 meters.
    pub fn load_zip(path: &Path) -> Result<PerimeterSet> {
        let bytes = std::fs::read(path).map_err(|source| GeoIndexError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(|source| GeoIndexError::Zip {
            path: path.to_path_buf(),
            source,
        })?;

        let shp_name = (0..archive.len())
            .filter_map(|i| archive.by_index(i).ok().map(|f| f.name().to_string()))
            .find(|name| name.to_lowercase().ends_with(".shp"))
            .ok_or_else(|| GeoIndexError::NoShapefileInArchive {
                path: path.to_path_buf(),
            })?;
        let stem = shp_name.trim_end_matches(".shp").trim_end_matches(".SHP").to_string();

        let tmp_dir = std::env::temp_dir().join(format!(
            "treksafer-shp-{}",
            path.file_stem().and_then(|s| s.to_str()).unwrap_or("layer")
        ));
        std::fs::create_dir_all(&tmp_dir).map_err(|source| GeoIndexError::Io {
            path: tmp_dir.clone(),
            source,
        })?;

        for ext in ["shp", "shx", "dbf"] {
            let member_name = format!("{stem}.{ext}");
            let mut member = match archive.by_name(&member_name) {
                Ok(m) => m,
                Err(_) => continue,
            };
            let mut contents = Vec::new();
            member.read_to_end(&mut contents).map_err(|source| GeoIndexError::Io {
                path: tmp_dir.clone(),
                source,
            })?;
            std::fs::write(tmp_dir.join(format!("layer.{ext}")), contents).map_err(|source| {
                GeoIndexError::Io {
                    path: tmp_dir.clone(),
                    source,
                }
            })?;
        }

        Self::load_shp_path(&tmp_dir.join("layer.shp"), path)
    }

    fn load_shp_path(shp_path: &Path, original: &Path) -> Result<PerimeterSet> {
        let mut reader = shapefile::Reader::from_path(shp_path).map_err(|source| GeoIndexError::Shapefile {
            path: original.to_path_buf(),
            source,
        })?;

        let mut rows = Vec::new();
        for result in reader.iter_shapes_and_records() {
            let (shape, record) = result.map_err(|source| GeoIndexError::Shapefile {
                path: original.to_path_buf(),
                source,
            })?;

            let Some(polygon) = shape_to_multi_polygon(&shape) else {
                continue;
            };

            let attributes = record
                .into_iter()
                .map(|(name, value)| (name, AttributeValue::from(&value)))
                .collect();

            rows.push(PerimeterRow { polygon, attributes });
        }

        Ok(PerimeterSet { rows })
    }
}
