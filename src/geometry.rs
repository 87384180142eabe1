//! Geographic bounding boxes and the raster geotransform.
//!
//! [`RasterGeometry`] wraps the affine mapping between pixel indices and
//! geographic coordinates for a north-up raster. The transform itself does no
//! bounds checking; window planning and extraction enforce raster extents.

use crate::error::{Result, SampleError};

/// Geographic bounding box in degrees.
///
/// Invariant: `min_lat < max_lat` and `min_lon < max_lon`. Immutable once
/// resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Create a bounding box, validating the min/max ordering.
    ///
    /// # Errors
    /// Returns [`SampleError::InvalidBoundingBox`] if either minimum is not
    /// strictly below its maximum.
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Result<Self> {
        if !(min_lat < max_lat && min_lon < max_lon) {
            return Err(SampleError::InvalidBoundingBox {
                min_lat,
                max_lat,
                min_lon,
                max_lon,
            });
        }
        Ok(Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        })
    }

    /// Assemble a bounding box from optional caller-supplied bounds.
    ///
    /// # Errors
    /// Returns [`SampleError::IncompleteBoundingBox`] if any bound is missing,
    /// or [`SampleError::InvalidBoundingBox`] if the ordering is wrong.
    pub fn from_parts(
        min_lat: Option<f64>,
        max_lat: Option<f64>,
        min_lon: Option<f64>,
        max_lon: Option<f64>,
    ) -> Result<Self> {
        match (min_lat, max_lat, min_lon, max_lon) {
            (Some(min_lat), Some(max_lat), Some(min_lon), Some(max_lon)) => {
                Self::new(min_lat, max_lat, min_lon, max_lon)
            }
            _ => Err(SampleError::IncompleteBoundingBox),
        }
    }
}

/// Pixel geometry of an open raster: geotransform origin and scale plus the
/// raster extents.
///
/// `pixel_height` is conventionally negative for north-up rasters (row index
/// grows southward). Invariant: `pixel_width != 0` and `pixel_height != 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterGeometry {
    pub origin_x: f64,
    pub origin_y: f64,
    pub pixel_width: f64,
    pub pixel_height: f64,
    pub rows: usize,
    pub cols: usize,
}

impl RasterGeometry {
    /// Create a raster geometry, rejecting zero-sized pixels.
    ///
    /// # Errors
    /// Returns [`SampleError::RasterUnreadable`] if either pixel dimension is
    /// zero (the transform would divide by it).
    pub fn new(
        origin_x: f64,
        origin_y: f64,
        pixel_width: f64,
        pixel_height: f64,
        rows: usize,
        cols: usize,
    ) -> Result<Self> {
        if pixel_width == 0.0 || pixel_height == 0.0 {
            return Err(SampleError::RasterUnreadable(
                "geotransform has zero-sized pixels".to_string(),
            ));
        }
        Ok(Self {
            origin_x,
            origin_y,
            pixel_width,
            pixel_height,
            rows,
            cols,
        })
    }

    /// Convert a geographic coordinate to a (row, col) pixel index.
    ///
    /// Indices are floored, may be negative or beyond the raster extents;
    /// callers clamp as needed.
    #[must_use]
    pub fn world_to_pixel(&self, lon: f64, lat: f64) -> (i64, i64) {
        // Allow cast truncation: the value is already floored
        #[allow(clippy::cast_possible_truncation)]
        let col = ((lon - self.origin_x) / self.pixel_width).floor() as i64;
        #[allow(clippy::cast_possible_truncation)]
        let row = ((self.origin_y - lat) / self.pixel_height.abs()).floor() as i64;
        (row, col)
    }

    /// Convert a (row, col) pixel index back to the geographic coordinate of
    /// the pixel's top-left corner, returned as (lon, lat).
    #[must_use]
    pub fn pixel_to_world(&self, row: usize, col: usize) -> (f64, f64) {
        // Allow cast precision loss: raster extents stay far below 2^52
        #[allow(clippy::cast_precision_loss)]
        let lon = self.origin_x + col as f64 * self.pixel_width;
        #[allow(clippy::cast_precision_loss)]
        let lat = self.origin_y + row as f64 * self.pixel_height;
        (lon, lat)
    }

    /// Angular pixel width in arc-seconds.
    #[must_use]
    pub fn pixel_arcseconds(&self) -> f64 {
        self.pixel_width.abs() * 3600.0
    }
}
