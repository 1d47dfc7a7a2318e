use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

/// Errors that can legitimately terminate the process. Everything else the
/// pipeline encounters (bad coordinates, missing shapefiles, failed HTTP
/// calls) degrades into a typed `Option`/`Result` the caller consumes, not
/// one of these.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
