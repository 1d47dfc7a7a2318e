//! Polygon boundary and perimeter indexing: load zipped ESRI shapefiles once,
//! project them to a planar metric space, and answer containment/nearest
//! queries against a bounded, mutex-guarded LRU of loaded sets.

pub mod attribute;
pub mod cache;
pub mod errors;
pub mod layer;
pub mod polygon;
pub mod query;

pub use attribute::AttributeValue;
pub use cache::GeoIndex;
pub use errors::{GeoIndexError, Result};
pub use layer::{PerimeterRow, PerimeterSet};
pub use query::{cover_or_nearest, distance_from_region, sources_for, ContainmentDistance};
