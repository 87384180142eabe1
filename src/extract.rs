//! Sample extraction: the stride walk over a planned pixel window.
//!
//! Traversal is row-major over ascending indices, so a given window always
//! produces the same sample order. Cells reading as the nodata sentinel, a
//! non-finite value, or a non-positive value carry no signal and are dropped
//! rather than kept as zero samples.

use tracing::debug;

use crate::error::Result;
use crate::grid::PixelWindow;
use crate::raster::RasterSource;

/// One accepted grid point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub lat: f64,
    pub lon: f64,
    pub raw_value: f64,
}

/// Walk `window` over `source` and collect the valid samples.
///
/// # Errors
/// Propagates [`crate::error::SampleError::RasterUnreadable`] from the
/// underlying source.
pub fn extract_samples<S: RasterSource>(source: &S, window: &PixelWindow) -> Result<Vec<Sample>> {
    extract_samples_with_progress(source, window, || {})
}

/// Like [`extract_samples`], invoking `on_point` after each grid point is
/// visited (accepted or dropped). Progress reporting is advisory only.
///
/// # Errors
/// Propagates [`crate::error::SampleError::RasterUnreadable`] from the
/// underlying source.
pub fn extract_samples_with_progress<S, F>(
    source: &S,
    window: &PixelWindow,
    mut on_point: F,
) -> Result<Vec<Sample>>
where
    S: RasterSource,
    F: FnMut(),
{
    let geometry = *source.geometry();
    let nodata = source.nodata();
    let mut samples: Vec<Sample> = Vec::new();
    let mut visited: u64 = 0;

    for row in (window.row_start..window.row_end).step_by(window.stride) {
        for col in (window.col_start..window.col_end).step_by(window.stride) {
            let value = source.read(row, col)?;
            visited += 1;

            let is_nodata = nodata.is_some_and(|sentinel| value == sentinel);
            if is_nodata || !value.is_finite() || value <= 0.0 {
                on_point();
                continue;
            }

            let (lon, lat) = geometry.pixel_to_world(row, col);
            samples.push(Sample {
                lat,
                lon,
                raw_value: value,
            });
            on_point();
        }
    }

    debug!(
        visited,
        accepted = samples.len(),
        stride = window.stride,
        "extraction finished"
    );
    Ok(samples)
}
