#![doc = include_str!("../README.md")]
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`region`]: Region catalog and resolution via the [`RegionSelector`] seam
//! - [`geometry`]: [`BoundingBox`] and the [`RasterGeometry`] geotransform
//! - [`grid`]: [`PixelWindow`] planning from a bounding box and a ground
//!   sampling distance
//! - [`raster`]: the [`RasterSource`] abstraction plus [`MemoryRaster`]
//! - [`geotiff`]: [`GeoTiffSource`], a `tiff`-crate-backed raster source
//! - [`extract`]: the stride walk producing [`Sample`] records
//! - [`metrics`]: radiance to mpsas to continuous Bortle conversions
//! - [`export`]: CSV and GeoJSON serialization
//! - [`compress`]: gzip/zip siblings for exported files
//! - [`cli`]: argument definitions and prompt adapters for the binary

// ============================================================================
// Public modules
// ============================================================================

pub mod cli;
pub mod compress;
pub mod error;
pub mod export;
pub mod extract;
pub mod geometry;
pub mod geotiff;
pub mod grid;
pub mod metrics;
pub mod raster;
pub mod region;

// ============================================================================
// Errors
// ============================================================================

pub use error::{Result, SampleError};

// ============================================================================
// Geometry
// ============================================================================

pub use geometry::{BoundingBox, RasterGeometry};

// ============================================================================
// Regions
// ============================================================================

pub use region::{
    resolve_bounds,
    resolve_region,
    FirstChoice,
    FixedSelection,
    Region,
    RegionSelector,
};

// ============================================================================
// Sampling
// ============================================================================

pub use extract::{extract_samples, extract_samples_with_progress, Sample};
pub use grid::{plan_window, PixelWindow, KM_PER_DEGREE};

// ============================================================================
// Raster Sources
// ============================================================================

pub use geotiff::GeoTiffSource;
pub use raster::{MemoryRaster, RasterSource};

// ============================================================================
// Metrics & Export
// ============================================================================

pub use compress::{compress_file, CompressionKind};
pub use export::{export_records, ExportFormat};
pub use metrics::{mpsas_to_bortle, radiance_to_mpsas, MetricDomain};
