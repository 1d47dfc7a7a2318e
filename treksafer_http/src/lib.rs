//! Shared HTTP client: one `reqwest` instance, cached to disk, reused by
//! every fetcher (avalanche forecasts, AQI lookups, shapefile refresh) so
//! they share a cache directory and a stale-if-error fallback.

pub mod cache;
pub mod errors;

pub use cache::CachedHttp;
pub use errors::{HttpError, Result};
