use thiserror::Error;

pub type Result<T> = std::result::Result<T, HttpError>;

/// Every outbound call in this crate resolves to one of these at the fetcher
/// boundary; callers turn a `NetworkError` into "absent data" rather than
/// propagating it further.
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest_middleware::Error,
    },

    #[error("request to {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("failed to read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("failed to write downloaded file to {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}
