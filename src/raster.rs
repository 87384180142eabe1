//! Raster source abstraction.
//!
//! The pipeline reads one cell at a time through [`RasterSource`]; anything
//! that can expose a geotransform, its extents, and point reads can feed the
//! extractor. [`MemoryRaster`] backs tests and embedders with synthetic data.

use crate::error::{Result, SampleError};
use crate::geometry::RasterGeometry;

/// A readable single-band raster grid.
pub trait RasterSource {
    /// Pixel geometry (geotransform plus extents) of the raster.
    fn geometry(&self) -> &RasterGeometry;

    /// The raster's designated "no data" sentinel, if any.
    fn nodata(&self) -> Option<f64>;

    /// Read the cell at (row, col).
    ///
    /// # Errors
    /// Returns [`SampleError::RasterUnreadable`] if the index is outside the
    /// raster extents or the underlying read fails.
    fn read(&self, row: usize, col: usize) -> Result<f64>;
}

/// In-memory raster over a row-major value buffer.
#[derive(Debug, Clone)]
pub struct MemoryRaster {
    geometry: RasterGeometry,
    values: Vec<f64>,
    nodata: Option<f64>,
}

impl MemoryRaster {
    /// Wrap a row-major buffer of `rows * cols` values.
    ///
    /// # Errors
    /// Returns [`SampleError::RasterUnreadable`] if the buffer length does
    /// not match the geometry extents.
    pub fn new(geometry: RasterGeometry, values: Vec<f64>, nodata: Option<f64>) -> Result<Self> {
        let expected = geometry.rows * geometry.cols;
        if values.len() != expected {
            return Err(SampleError::RasterUnreadable(format!(
                "buffer holds {} values but geometry expects {expected}",
                values.len()
            )));
        }
        Ok(Self {
            geometry,
            values,
            nodata,
        })
    }
}

impl RasterSource for MemoryRaster {
    fn geometry(&self) -> &RasterGeometry {
        &self.geometry
    }

    fn nodata(&self) -> Option<f64> {
        self.nodata
    }

    fn read(&self, row: usize, col: usize) -> Result<f64> {
        if row >= self.geometry.rows || col >= self.geometry.cols {
            return Err(SampleError::RasterUnreadable(format!(
                "read at ({row}, {col}) outside raster extents {}x{}",
                self.geometry.rows, self.geometry.cols
            )));
        }
        Ok(self.values[row * self.geometry.cols + col])
    }
}
