use thiserror::Error;

pub type Result<T> = std::result::Result<T, GeoIndexError>;

/// Shapefile and archive failures never propagate past this crate: every
/// caller sees a degraded-but-defined [`crate::layer::PerimeterSet::empty`]
/// instead, per the "operational degradation, never a crash" rule.
#[derive(Error, Debug)]
pub enum GeoIndexError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to open zip archive {path}: {source}")]
    Zip {
        path: std::path::PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("zip archive {path} contains no .shp member")]
    NoShapefileInArchive { path: std::path::PathBuf },

    #[error("failed to read shapefile extracted from {path}: {source}")]
    Shapefile {
        path: std::path::PathBuf,
        #[source]
        source: shapefile::Error,
    },
}
