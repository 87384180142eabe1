//! End-to-end pipeline scenarios: region -> window -> extraction -> export.

use skysample::{
    export_records, extract_samples, mpsas_to_bortle, plan_window, radiance_to_mpsas,
    resolve_region, BoundingBox, CompressionKind, ExportFormat, FixedSelection, MemoryRaster,
    MetricDomain, RasterGeometry, RasterSource, SampleError,
};

/// 2x2 raster with 15 arc-second pixels, origin at (0E, 1N), the standard
/// -32768 sentinel, and one zero cell.
fn two_by_two() -> MemoryRaster {
    let geometry = RasterGeometry::new(0.0, 1.0, 15.0 / 3600.0, -15.0 / 3600.0, 2, 2).unwrap();
    MemoryRaster::new(
        geometry,
        vec![5.0, 0.0, -32768.0, 3.0],
        Some(-32768.0),
    )
    .unwrap()
}

#[test]
fn test_full_raster_yields_only_signal_cells() {
    let raster = two_by_two();
    // Covers the full raster extent
    let bbox = BoundingBox::new(0.985, 1.0, 0.0, 0.012).unwrap();
    let window = plan_window(&bbox, raster.geometry(), 0.5).unwrap();
    assert_eq!(window.stride, 1);

    let samples = extract_samples(&raster, &window).unwrap();
    assert_eq!(samples.len(), 2);
    assert_eq!(samples[0].raw_value, 5.0);
    assert_eq!(samples[1].raw_value, 3.0);
}

#[test]
fn test_radiance_csv_export_end_to_end() {
    let raster = two_by_two();
    let bbox = BoundingBox::new(0.985, 1.0, 0.0, 0.012).unwrap();
    let window = plan_window(&bbox, raster.geometry(), 0.5).unwrap();
    let samples = extract_samples(&raster, &window).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = export_records(
        &samples,
        dir.path().join("out"),
        ExportFormat::Csv,
        MetricDomain::Radiance,
    )
    .unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Latitude;Longitude;Radiance;mpsas;Bortle");
    assert_eq!(lines.len(), 3);

    // First record is the (0, 0) cell: its top-left corner and raw value 5
    let fields: Vec<&str> = lines[1].split(';').collect();
    assert_eq!(fields[0], "1");
    assert_eq!(fields[1], "0");
    assert_eq!(fields[2], "5");
    let expected_bortle = mpsas_to_bortle(radiance_to_mpsas(5.0));
    assert_eq!(fields[4], expected_bortle.to_string());
}

#[test]
fn test_region_to_geojson_with_compression() {
    // Compose the stages the binary runs, against the Canary Islands
    // sub-region and a synthetic raster covering its north-west corner.
    let region = resolve_region("ESP", &FixedSelection(1)).unwrap();
    assert_eq!(region.name, "Canary Islands");

    let geometry = RasterGeometry::new(
        region.bbox.min_lon,
        region.bbox.max_lat,
        15.0 / 3600.0,
        -15.0 / 3600.0,
        24,
        24,
    )
    .unwrap();
    let values: Vec<f64> = (0..24 * 24).map(|i| 0.5 + i as f64 * 1e-3).collect();
    let raster = MemoryRaster::new(geometry, values, Some(-32768.0)).unwrap();

    let window = plan_window(&region.bbox, raster.geometry(), 2.0).unwrap();
    assert_eq!(window.stride, 4);
    // The raster covers only a corner of the region; the window clamps to it
    assert_eq!(window.row_end, 24);
    assert_eq!(window.col_end, 24);

    let samples = extract_samples(&raster, &window).unwrap();
    assert_eq!(samples.len() as u64, window.expected_points());

    let dir = tempfile::tempdir().unwrap();
    let path = export_records(
        &samples,
        dir.path().join("canary"),
        ExportFormat::GeoJson,
        MetricDomain::Radiance,
    )
    .unwrap();
    assert!(path.to_string_lossy().ends_with("canary.geojson"));

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let features = value["features"].as_array().unwrap();
    assert_eq!(features.len(), samples.len());
    // Every feature carries the full radiance property set
    for feature in features {
        let properties = feature["properties"].as_object().unwrap();
        assert!(properties.contains_key("Radiance"));
        assert!(properties.contains_key("mpsas"));
        assert!(properties.contains_key("Bortle"));
    }

    // Compression runs strictly on the exporter's returned path
    let gz = skysample::compress_file(&path, CompressionKind::Gzip).unwrap();
    assert_eq!(gz, path.with_extension("geojson.gz"));
}

#[test]
fn test_out_of_raster_region_produces_empty_export() {
    let raster = two_by_two();
    // Australia does not intersect a raster at (0E, 1N)
    let region = resolve_region("AUS", &skysample::FirstChoice).unwrap();
    let window = plan_window(&region.bbox, raster.geometry(), 0.5).unwrap();
    assert!(window.is_empty());

    let samples = extract_samples(&raster, &window).unwrap();
    assert!(samples.is_empty());

    let dir = tempfile::tempdir().unwrap();
    let path = export_records(
        &samples,
        dir.path().join("aus"),
        ExportFormat::Csv,
        MetricDomain::Radiance,
    )
    .unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 1);
}

#[test]
fn test_sub_pixel_interval_fails_before_extraction() {
    let raster = two_by_two();
    let bbox = BoundingBox::new(0.985, 1.0, 0.0, 0.012).unwrap();
    let err = plan_window(&bbox, raster.geometry(), 0.1).unwrap_err();
    assert!(matches!(err, SampleError::SamplingTooFine { .. }));
}

#[test]
fn test_elevation_domain_end_to_end() {
    let geometry = RasterGeometry::new(-4.0, 41.0, 15.0 / 3600.0, -15.0 / 3600.0, 4, 4).unwrap();
    let raster = MemoryRaster::new(
        geometry,
        vec![
            612.0, 640.0, -32768.0, 655.0, //
            700.0, 0.0, 710.0, 715.0, //
            800.0, 810.0, 820.0, 830.0, //
            900.0, 910.0, 920.0, 930.0,
        ],
        Some(-32768.0),
    )
    .unwrap();

    let bbox = BoundingBox::new(40.97, 41.0, -4.0, -3.98).unwrap();
    let window = plan_window(&bbox, raster.geometry(), 0.5).unwrap();
    let samples = extract_samples(&raster, &window).unwrap();
    // 16 cells minus the sentinel and the zero reading
    assert_eq!(samples.len(), 14);

    let dir = tempfile::tempdir().unwrap();
    let path = export_records(
        &samples,
        dir.path().join("dem.csv"),
        ExportFormat::Csv,
        MetricDomain::Elevation,
    )
    .unwrap();
    // Already-suffixed destination is not double-suffixed
    assert!(path.to_string_lossy().ends_with("dem.csv"));

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().next().unwrap(), "Latitude;Longitude;Elevation");
    assert_eq!(text.lines().count(), 15);
}
