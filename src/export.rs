//! Record export: semicolon-delimited CSV and GeoJSON.
//!
//! Each accepted sample becomes one CSV row or one GeoJSON `Point` feature
//! carrying the raw value and the domain's derived metrics. Derivation runs
//! lazily per record while writing; nothing is persisted besides the output
//! file. Returns the path actually written so compression can locate it.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Number, Value};
use tracing::info;

use crate::error::Result;
use crate::extract::Sample;
use crate::metrics::MetricDomain;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    /// Semicolon-delimited table with a header row.
    Csv,
    /// GeoJSON FeatureCollection of Point features.
    #[value(name = "geojson")]
    GeoJson,
}

impl ExportFormat {
    /// Canonical file extension for the format.
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::GeoJson => "geojson",
        }
    }

    /// The path [`export_records`] will actually write for `destination`:
    /// the canonical extension is appended unless already present. Calling
    /// twice with an already-suffixed name does not double-suffix.
    ///
    /// Callers that need to inspect the output location before exporting
    /// (overwrite checks, compression) must resolve through this.
    #[must_use]
    pub fn resolve_path(&self, destination: &Path) -> PathBuf {
        let suffixed = destination
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(self.extension()));
        if suffixed {
            destination.to_path_buf()
        } else {
            let mut name = destination.as_os_str().to_os_string();
            name.push(".");
            name.push(self.extension());
            PathBuf::from(name)
        }
    }
}

#[derive(Serialize)]
struct FeatureCollection {
    #[serde(rename = "type")]
    kind: &'static str,
    features: Vec<Feature>,
}

#[derive(Serialize)]
struct Feature {
    #[serde(rename = "type")]
    kind: &'static str,
    geometry: PointGeometry,
    properties: Map<String, Value>,
}

#[derive(Serialize)]
struct PointGeometry {
    #[serde(rename = "type")]
    kind: &'static str,
    /// GeoJSON order: [longitude, latitude]
    coordinates: [f64; 2],
}

/// Serialize `samples` to `destination` in the chosen format.
///
/// # Errors
/// Returns [`crate::error::SampleError::ExportIo`] if the file cannot be
/// created or written; partial files are not a supported recovery state.
pub fn export_records<P: AsRef<Path>>(
    samples: &[Sample],
    destination: P,
    format: ExportFormat,
    domain: MetricDomain,
) -> Result<PathBuf> {
    let path = format.resolve_path(destination.as_ref());
    let mut writer = BufWriter::new(File::create(&path)?);

    match format {
        ExportFormat::Csv => write_csv(&mut writer, samples, domain)?,
        ExportFormat::GeoJson => write_geojson(&mut writer, samples, domain)?,
    }
    writer.flush()?;

    info!(records = samples.len(), path = %path.display(), "export finished");
    Ok(path)
}

fn write_csv<W: Write>(writer: &mut W, samples: &[Sample], domain: MetricDomain) -> Result<()> {
    write!(writer, "Latitude;Longitude;{}", domain.raw_field())?;
    for field in domain.derived_fields() {
        write!(writer, ";{field}")?;
    }
    writeln!(writer)?;

    for sample in samples {
        write!(writer, "{};{};{}", sample.lat, sample.lon, sample.raw_value)?;
        for (_, value) in domain.derive(sample.raw_value) {
            write!(writer, ";{value}")?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

fn write_geojson<W: Write>(writer: &mut W, samples: &[Sample], domain: MetricDomain) -> Result<()> {
    let features = samples
        .iter()
        .map(|sample| {
            let mut properties = Map::new();
            properties.insert(
                domain.raw_field().to_string(),
                json_number(sample.raw_value),
            );
            for (field, value) in domain.derive(sample.raw_value) {
                properties.insert(field.to_string(), json_number(value));
            }
            Feature {
                kind: "Feature",
                geometry: PointGeometry {
                    kind: "Point",
                    coordinates: [sample.lon, sample.lat],
                },
                properties,
            }
        })
        .collect();

    let collection = FeatureCollection {
        kind: "FeatureCollection",
        features,
    };
    serde_json::to_writer(writer, &collection)
        .map_err(|e| crate::error::SampleError::ExportIo(std::io::Error::other(e)))?;
    Ok(())
}

fn json_number(value: f64) -> Value {
    Number::from_f64(value).map_or(Value::Null, Value::Number)
}
