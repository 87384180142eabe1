//! Post-export file compression.
//!
//! Produces a compressed sibling next to the exporter's returned path
//! (`out.csv` -> `out.csv.gz` or `out.csv.zip`), leaving the original in
//! place.

use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use tracing::info;

use crate::error::Result;

/// Supported compression schemes for exported files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CompressionKind {
    Gzip,
    Zip,
}

impl CompressionKind {
    fn extension(&self) -> &'static str {
        match self {
            Self::Gzip => "gz",
            Self::Zip => "zip",
        }
    }
}

/// Compress `path` into a sibling file, returning the sibling's path.
///
/// # Errors
/// Returns [`crate::error::SampleError::ExportIo`] if the source cannot be
/// read or the sibling cannot be written.
pub fn compress_file(path: &Path, kind: CompressionKind) -> Result<PathBuf> {
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(kind.extension());
    let target = PathBuf::from(name);

    let mut source = BufReader::new(File::open(path)?);
    match kind {
        CompressionKind::Gzip => {
            let mut encoder = GzEncoder::new(
                BufWriter::new(File::create(&target)?),
                flate2::Compression::best(),
            );
            io::copy(&mut source, &mut encoder)?;
            encoder.finish()?;
        }
        CompressionKind::Zip => {
            let mut writer = zip::ZipWriter::new(File::create(&target)?);
            let entry_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("export")
                .to_string();
            writer
                .start_file(entry_name, zip::write::FileOptions::default())
                .map_err(zip_to_io)?;
            io::copy(&mut source, &mut writer)?;
            writer.finish().map_err(zip_to_io)?;
        }
    }

    info!(path = %target.display(), "compressed export");
    Ok(target)
}

fn zip_to_io(e: zip::result::ZipError) -> crate::error::SampleError {
    crate::error::SampleError::ExportIo(io::Error::other(e))
}
