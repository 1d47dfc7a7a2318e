//! Avalanche forecast dispatch: pick the configured provider that covers a
//! point, fetch its forecast, narrow it to the requested dates, and format it.

pub mod canada;
pub mod format;
pub mod provider;
pub mod quebec;
pub mod registry;
pub mod report;
pub mod selection;
pub mod types;

pub use provider::AvalancheProvider;
pub use registry::build_providers;
pub use report::AvalancheReport;
pub use types::ForecastData;
