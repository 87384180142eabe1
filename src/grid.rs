//! Sampling grid planning.
//!
//! Turns a geographic bounding box plus a raster's pixel geometry into a
//! pixel-index window and the stride that approximates a requested ground
//! sampling distance.

use tracing::debug;

use crate::error::{Result, SampleError};
use crate::geometry::{BoundingBox, RasterGeometry};

/// Kilometers per degree of arc at the equator scale used throughout.
pub const KM_PER_DEGREE: f64 = 111.32;

/// A pixel-index window with a sampling stride.
///
/// Ranges are half-open (`row_start..row_end`); an empty window has
/// `row_start == row_end` (and likewise for columns) and yields no grid
/// points. `stride` is in pixel units and always >= 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelWindow {
    pub row_start: usize,
    pub row_end: usize,
    pub col_start: usize,
    pub col_end: usize,
    pub stride: usize,
}

impl PixelWindow {
    /// Whether the window covers no pixels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.row_start >= self.row_end || self.col_start >= self.col_end
    }

    /// Number of grid points a stride walk over this window visits.
    #[must_use]
    pub fn expected_points(&self) -> u64 {
        if self.is_empty() {
            return 0;
        }
        let rows = (self.row_end - self.row_start).div_ceil(self.stride) as u64;
        let cols = (self.col_end - self.col_start).div_ceil(self.stride) as u64;
        rows * cols
    }

    fn empty(stride: usize) -> Self {
        Self {
            row_start: 0,
            row_end: 0,
            col_start: 0,
            col_end: 0,
            stride,
        }
    }
}

/// Plan the pixel window covering `bbox` at roughly `ground_distance_km`
/// spacing between sampled points.
///
/// The ground distance is converted to arc-seconds at the equator scale and
/// divided by the raster's angular pixel size to get the stride, floored and
/// clamped to a minimum of one pixel. Window corners come from the
/// geotransform applied to the bbox corners, clamped to the raster extents;
/// a bbox entirely outside the raster yields an empty window rather than an
/// error.
///
/// # Errors
/// Returns [`SampleError::SamplingTooFine`] if `ground_distance_km` is below
/// the raster's native resolution (sub-pixel sampling is not supported).
pub fn plan_window(
    bbox: &BoundingBox,
    geometry: &RasterGeometry,
    ground_distance_km: f64,
) -> Result<PixelWindow> {
    let pixel_arcsec = geometry.pixel_arcseconds();
    let requested_arcsec = ground_distance_km * 3600.0 / KM_PER_DEGREE;

    if requested_arcsec < pixel_arcsec {
        return Err(SampleError::SamplingTooFine {
            requested_km: ground_distance_km,
            native_km: pixel_arcsec * KM_PER_DEGREE / 3600.0,
        });
    }

    // Allow cast truncation and sign loss: the ratio is >= 1 here
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let stride = ((requested_arcsec / pixel_arcsec).floor() as usize).max(1);

    // North-up raster: the top of the window comes from the maximum latitude.
    let (top_row, left_col) = geometry.world_to_pixel(bbox.min_lon, bbox.max_lat);
    let (bottom_row, right_col) = geometry.world_to_pixel(bbox.max_lon, bbox.min_lat);

    let row_start = top_row.max(0);
    let row_last = bottom_row.min(geometry.rows as i64 - 1);
    let col_start = left_col.max(0);
    let col_last = right_col.min(geometry.cols as i64 - 1);

    if row_last < row_start || col_last < col_start {
        debug!(?bbox, "bounding box does not intersect the raster");
        return Ok(PixelWindow::empty(stride));
    }

    // Casts are safe: both ends are clamped to [0, extent) above
    #[allow(clippy::cast_sign_loss)]
    let window = PixelWindow {
        row_start: row_start as usize,
        row_end: row_last as usize + 1,
        col_start: col_start as usize,
        col_end: col_last as usize + 1,
        stride,
    };
    debug!(
        ?window,
        stride,
        points = window.expected_points(),
        "planned sampling window"
    );
    Ok(window)
}
