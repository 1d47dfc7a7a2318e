//! Typed settings loaded once at startup from YAML plus environment
//! placeholders, then handed out read-only for the rest of the process.

pub mod errors;
pub mod loader;
pub mod settings;

pub use errors::{ConfigError, Result};
pub use loader::{default_config_dir, load, load_env, load_file};
pub use settings::{
    ApiEnrichment, AvalancheProviderConfig, AvalancheSettings, BoundarySettings, DataSource,
    FieldMapping, RefreshJobConfig, Settings, TransportConfig,
};
