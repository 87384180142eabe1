//! Command-line argument definitions and interactive prompt adapters.

use std::path::PathBuf;

use clap::Parser;
use dialoguer::{Confirm, Select};

use crate::compress::CompressionKind;
use crate::error::{Result, SampleError};
use crate::export::ExportFormat;
use crate::metrics::MetricDomain;
use crate::region::RegionSelector;

#[derive(Parser, Debug)]
#[command(name = "skysample")]
#[command(about = "Sample a georeferenced raster over a region and export derived sky metrics")]
#[command(version)]
pub struct Args {
    /// Input GeoTIFF to sample
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Output filename; the format's extension is appended if missing
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    pub format: ExportFormat,

    /// Physical quantity the raster holds
    #[arg(short, long, value_enum, default_value = "radiance")]
    pub domain: MetricDomain,

    /// ISO3 code of the region to extract data for
    #[arg(short, long, value_name = "CODE")]
    pub country: Option<String>,

    /// Minimum latitude of an explicit bounding box
    #[arg(long, value_name = "DEG", allow_hyphen_values = true)]
    pub min_lat: Option<f64>,

    /// Maximum latitude of an explicit bounding box
    #[arg(long, value_name = "DEG", allow_hyphen_values = true)]
    pub max_lat: Option<f64>,

    /// Minimum longitude of an explicit bounding box
    #[arg(long, value_name = "DEG", allow_hyphen_values = true)]
    pub min_lon: Option<f64>,

    /// Maximum longitude of an explicit bounding box
    #[arg(long, value_name = "DEG", allow_hyphen_values = true)]
    pub max_lon: Option<f64>,

    /// Ground distance between sampled points, in kilometers
    #[arg(long, value_name = "KM", default_value_t = 0.5)]
    pub interval_km: f64,

    /// Compress the output file after export
    #[arg(long, value_enum, value_name = "SCHEME")]
    pub compress: Option<CompressionKind>,

    /// Print verbose output
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress all output and prompts
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// The output path the exporter will actually write, with the format's
    /// extension applied. Overwrite checks run against this, not the raw
    /// `--output` value.
    #[must_use]
    pub fn resolved_output(&self) -> PathBuf {
        self.format.resolve_path(&self.output)
    }
}

/// Terminal-backed region selector using a dialoguer select prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptSelector;

impl RegionSelector for PromptSelector {
    fn choose(&self, prompt: &str, options: &[&str]) -> Result<usize> {
        Select::new()
            .with_prompt(prompt)
            .items(options)
            .default(0)
            .interact()
            .map_err(|e| SampleError::Selection(e.to_string()))
    }
}

/// Ask whether an existing output file may be overwritten.
///
/// # Errors
/// Returns [`SampleError::Selection`] if the prompt cannot be shown.
pub fn confirm_overwrite(path: &std::path::Path) -> Result<bool> {
    Confirm::new()
        .with_prompt(format!(
            "The file \"{}\" already exists. Overwrite it?",
            path.display()
        ))
        .default(false)
        .interact()
        .map_err(|e| SampleError::Selection(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_country_run() {
        let args = Args::parse_from([
            "skysample",
            "--input",
            "viirs.tif",
            "--output",
            "ES",
            "--country",
            "ESP",
            "--format",
            "geojson",
            "--compress",
            "gzip",
        ]);
        assert_eq!(args.country.as_deref(), Some("ESP"));
        assert_eq!(args.format, ExportFormat::GeoJson);
        assert_eq!(args.compress, Some(CompressionKind::Gzip));
        assert_eq!(args.interval_km, 0.5);
        assert_eq!(args.domain, MetricDomain::Radiance);
    }

    #[test]
    fn test_parse_explicit_bounds() {
        let args = Args::parse_from([
            "skysample",
            "--input",
            "dem.tif",
            "--output",
            "out",
            "--domain",
            "elevation",
            "--min-lat",
            "35.9",
            "--max-lat",
            "43.7",
            "--min-lon",
            "-9.4",
            "--max-lon",
            "3.0",
            "--interval-km",
            "2",
        ]);
        assert_eq!(args.min_lon, Some(-9.4));
        assert_eq!(args.interval_km, 2.0);
        assert_eq!(args.domain, MetricDomain::Elevation);
    }

    #[test]
    fn test_resolved_output_sees_existing_suffixed_file() {
        // `--output ES --format csv` must trigger the overwrite prompt when
        // ES.csv already exists, even though the raw destination does not.
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ES.csv"), "old").unwrap();
        let destination = dir.path().join("ES");

        let args = Args::parse_from([
            "skysample",
            "--input",
            "viirs.tif",
            "--output",
            destination.to_str().unwrap(),
        ]);
        assert!(!args.output.exists());
        assert!(args.resolved_output().exists());
        assert_eq!(args.resolved_output(), dir.path().join("ES.csv"));
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        let result = Args::try_parse_from([
            "skysample", "--input", "a.tif", "--output", "b", "--verbose", "--quiet",
        ]);
        assert!(result.is_err());
    }
}
