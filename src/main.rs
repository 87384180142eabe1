use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use tracing_subscriber::EnvFilter;

use skysample::cli::{confirm_overwrite, Args, PromptSelector};
use skysample::compress::compress_file;
use skysample::export::export_records;
use skysample::extract::extract_samples_with_progress;
use skysample::geotiff::GeoTiffSource;
use skysample::grid::plan_window;
use skysample::raster::RasterSource;
use skysample::region::{resolve_bounds, resolve_region, FirstChoice, Region, RegionSelector};

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "skysample=debug"
    } else if args.quiet {
        "error"
    } else {
        "skysample=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .init();

    let region = resolve(&args).context("failed to resolve the sampling region")?;
    info!(
        region = %region.name,
        lat = format!("{}..{}", region.bbox.min_lat, region.bbox.max_lat),
        lon = format!("{}..{}", region.bbox.min_lon, region.bbox.max_lon),
        "resolved region"
    );

    let destination = args.resolved_output();
    if destination.exists() && !args.quiet {
        let overwrite =
            confirm_overwrite(&destination).context("overwrite confirmation failed")?;
        if !overwrite {
            return Ok(());
        }
    }

    let raster = GeoTiffSource::open(&args.input)
        .with_context(|| format!("failed to open raster {}", args.input.display()))?;

    let window = plan_window(&region.bbox, raster.geometry(), args.interval_km)
        .context("failed to plan the sampling window")?;
    info!(
        stride = window.stride,
        points = window.expected_points(),
        "planned sampling grid"
    );

    let bar = if args.quiet {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(window.expected_points());
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} points",
            )
            .expect("progress template is valid")
            .progress_chars("#>-"),
        );
        bar
    };
    let samples = extract_samples_with_progress(&raster, &window, || bar.inc(1))
        .context("sample extraction failed")?;
    bar.finish_and_clear();
    info!(samples = samples.len(), "extraction finished");

    let path = export_records(&samples, &destination, args.format, args.domain)
        .context("export failed")?;
    info!(
        records = samples.len(),
        region = %region.name,
        path = %path.display(),
        "export finished"
    );

    if let Some(kind) = args.compress {
        let compressed = compress_file(&path, kind).context("compression failed")?;
        info!(path = %compressed.display(), "compression finished");
    }

    Ok(())
}

/// Resolve the sampling region from a country code or explicit bounds. A
/// composite code prompts for a sub-region unless running quietly.
fn resolve(args: &Args) -> Result<Region> {
    let region = match &args.country {
        Some(code) => {
            let selector: &dyn RegionSelector = if args.quiet {
                &FirstChoice
            } else {
                &PromptSelector
            };
            resolve_region(code, selector)?
        }
        None => resolve_bounds(args.min_lat, args.max_lat, args.min_lon, args.max_lon)?,
    };
    Ok(region)
}
