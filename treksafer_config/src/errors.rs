use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Configuration errors are the one class of error in this system that is
/// fatal at startup rather than degraded into a reply message.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(std::path::PathBuf),

    #[error("io error reading {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to expand placeholders in {path}: {source}")]
    PlaceholderExpansion {
        path: std::path::PathBuf,
        source: shellexpand::LookupError<std::env::VarError>,
    },

    #[error("invalid yaml in {path}: {source}")]
    Yaml {
        path: std::path::PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("transport '{transport}' is enabled but missing required field(s): {detail}")]
    IncompleteTransport { transport: String, detail: String },
}
