//! GeoTIFF-backed raster source.
//!
//! Pure-Rust decoding through the `tiff` crate: the geotransform comes from
//! the ModelPixelScale and ModelTiepoint tags, the nodata sentinel from the
//! GDAL nodata tag, and the single band is materialized as `f64` at open
//! time so point reads are plain indexing.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tiff::decoder::{Decoder, DecodingResult};
use tiff::tags::Tag;
use tracing::debug;

use crate::error::{Result, SampleError};
use crate::geometry::RasterGeometry;
use crate::raster::RasterSource;

/// A single-band GeoTIFF opened for point reads.
pub struct GeoTiffSource {
    geometry: RasterGeometry,
    nodata: Option<f64>,
    values: Vec<f64>,
}

impl GeoTiffSource {
    /// Open and fully decode a GeoTIFF.
    ///
    /// # Errors
    /// Returns [`SampleError::RasterUnreadable`] if the file cannot be read,
    /// is not a single-band raster, or lacks the geotransform tags.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            SampleError::RasterUnreadable(format!("cannot open {}: {e}", path.display()))
        })?;
        let mut decoder = Decoder::new(BufReader::new(file)).map_err(tiff_err)?;

        let (width, height) = decoder.dimensions().map_err(tiff_err)?;
        let (cols, rows) = (width as usize, height as usize);

        // The decoder canonicalizes known tag IDs while parsing the IFD, so
        // lookups must use the named tags rather than their raw IDs.
        let scale = decoder
            .get_tag_f64_vec(Tag::ModelPixelScaleTag)
            .map_err(|_| {
                SampleError::RasterUnreadable("missing ModelPixelScale tag".to_string())
            })?;
        let tiepoint = decoder
            .get_tag_f64_vec(Tag::ModelTiepointTag)
            .map_err(|_| {
                SampleError::RasterUnreadable("missing ModelTiepoint tag".to_string())
            })?;
        if scale.len() < 2 || tiepoint.len() < 5 {
            return Err(SampleError::RasterUnreadable(
                "truncated geotransform tags".to_string(),
            ));
        }

        // Tiepoint maps raster point (i, j) to world point (x, y); shift the
        // origin back to pixel (0, 0). North-up convention: rows grow
        // southward, so pixel height is the negated Y scale.
        let origin_x = tiepoint[3] - tiepoint[0] * scale[0];
        let origin_y = tiepoint[4] + tiepoint[1] * scale[1];
        let geometry = RasterGeometry::new(origin_x, origin_y, scale[0], -scale[1], rows, cols)?;

        let nodata = decoder
            .get_tag_ascii_string(Tag::GdalNodata)
            .ok()
            .and_then(|s| s.trim_end_matches('\0').trim().parse::<f64>().ok());

        let values = match decoder.read_image().map_err(tiff_err)? {
            DecodingResult::U8(v) => v.into_iter().map(f64::from).collect(),
            DecodingResult::U16(v) => v.into_iter().map(f64::from).collect(),
            DecodingResult::U32(v) => v.into_iter().map(f64::from).collect(),
            #[allow(clippy::cast_precision_loss)]
            DecodingResult::U64(v) => v.into_iter().map(|x| x as f64).collect(),
            DecodingResult::I8(v) => v.into_iter().map(f64::from).collect(),
            DecodingResult::I16(v) => v.into_iter().map(f64::from).collect(),
            DecodingResult::I32(v) => v.into_iter().map(f64::from).collect(),
            #[allow(clippy::cast_precision_loss)]
            DecodingResult::I64(v) => v.into_iter().map(|x| x as f64).collect(),
            DecodingResult::F32(v) => v.into_iter().map(f64::from).collect(),
            DecodingResult::F64(v) => v,
        };
        if values.len() != rows * cols {
            return Err(SampleError::RasterUnreadable(format!(
                "expected a single-band {cols}x{rows} raster, decoded {} values",
                values.len()
            )));
        }

        debug!(
            path = %path.display(),
            rows, cols, ?nodata,
            "opened GeoTIFF"
        );
        Ok(Self {
            geometry,
            nodata,
            values,
        })
    }
}

impl RasterSource for GeoTiffSource {
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

fn tiff_err(e: tiff::TiffError) -> SampleError {
    SampleError::RasterUnreadable(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tiff::encoder::{colortype::Gray32Float, TiffEncoder};

    /// Encode a 2x2 Gray32Float GeoTIFF with 15 arc-second pixels, origin at
    /// (0E, 1N) and a -32768 nodata sentinel.
    fn write_test_geotiff(dir: &Path, pixels: &[f32; 4]) -> PathBuf {
        let path = dir.join("test.tif");
        let file = File::create(&path).unwrap();
        let mut encoder = TiffEncoder::new(file).unwrap();
        let mut image = encoder.new_image::<Gray32Float>(2, 2).unwrap();

        let scale = [15.0 / 3600.0, 15.0 / 3600.0, 0.0];
        image
            .encoder()
            .write_tag(Tag::ModelPixelScaleTag, scale.as_slice())
            .unwrap();
        let tiepoint = [0.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        image
            .encoder()
            .write_tag(Tag::ModelTiepointTag, tiepoint.as_slice())
            .unwrap();
        image
            .encoder()
            .write_tag(Tag::GdalNodata, "-32768")
            .unwrap();
        image.write_data(pixels.as_slice()).unwrap();
        path
    }

    #[test]
    fn test_open_reads_geotransform_and_nodata() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_geotiff(dir.path(), &[5.0, 0.0, -32768.0, 3.0]);

        let source = GeoTiffSource::open(&path).unwrap();
        let geometry = source.geometry();
        assert_eq!((geometry.rows, geometry.cols), (2, 2));
        assert_eq!(geometry.origin_x, 0.0);
        assert_eq!(geometry.origin_y, 1.0);
        assert!(geometry.pixel_height < 0.0);
        assert!((geometry.pixel_arcseconds() - 15.0).abs() < 1e-9);
        assert_eq!(source.nodata(), Some(-32768.0));
    }

    #[test]
    fn test_point_reads_row_major() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_geotiff(dir.path(), &[5.0, 0.0, -32768.0, 3.0]);

        let source = GeoTiffSource::open(&path).unwrap();
        assert_eq!(source.read(0, 0).unwrap(), 5.0);
        assert_eq!(source.read(0, 1).unwrap(), 0.0);
        assert_eq!(source.read(1, 0).unwrap(), -32768.0);
        assert_eq!(source.read(1, 1).unwrap(), 3.0);
        assert!(source.read(2, 0).is_err());
    }

    #[test]
    fn test_missing_file_is_unreadable() {
        assert!(matches!(
            GeoTiffSource::open("/nonexistent/raster.tif"),
            Err(SampleError::RasterUnreadable(_))
        ));
    }

    #[test]
    fn test_plain_tiff_without_geotags_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.tif");
        let file = File::create(&path).unwrap();
        let mut encoder = TiffEncoder::new(file).unwrap();
        encoder
            .write_image::<Gray32Float>(2, 2, &[1.0f32, 2.0, 3.0, 4.0])
            .unwrap();

        assert!(matches!(
            GeoTiffSource::open(&path),
            Err(SampleError::RasterUnreadable(_))
        ));
    }
}
