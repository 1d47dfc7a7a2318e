//! Wildfire perimeter search: resolve which data sources are relevant to a
//! point, pull and normalize matching perimeter rows, enrich them against
//! each source's auxiliary API, and apply the status/size filter pipeline.

pub mod enrichment;
pub mod filters;
pub mod finder;
pub mod glob_select;
pub mod normalize;
pub mod transforms;
pub mod types;

pub use finder::{FireFinder, FireQuery};
pub use types::{FireRecord, FireValue};
