//! Error types for the sampling pipeline.
//!
//! Every failure is terminal for the current invocation: nothing is retried
//! internally, and each variant identifies the stage that failed.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SampleError {
    #[error("unknown region code `{0}`")]
    RegionNotFound(String),

    #[error("bounding box is incomplete: all four of min-lat, max-lat, min-lon, max-lon are required")]
    IncompleteBoundingBox,

    #[error("invalid bounding box: lat {min_lat}..{max_lat}, lon {min_lon}..{max_lon} (minimum must be below maximum)")]
    InvalidBoundingBox {
        min_lat: f64,
        max_lat: f64,
        min_lon: f64,
        max_lon: f64,
    },

    #[error("sampling interval of {requested_km} km is below the raster's native resolution of {native_km:.4} km")]
    SamplingTooFine { requested_km: f64, native_km: f64 },

    #[error("raster unreadable: {0}")]
    RasterUnreadable(String),

    #[error("export I/O failure: {0}")]
    ExportIo(#[from] std::io::Error),

    #[error("region selection failed: {0}")]
    Selection(String),
}

pub type Result<T> = std::result::Result<T, SampleError>;
