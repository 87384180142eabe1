//! Region catalog and resolution.
//!
//! Maps a region code (ISO3, or a named sub-area such as `ESP_CANARY`) to a
//! display name plus geographic bounding box. Composite codes offer a choice
//! among sub-regions through an injected [`RegionSelector`], keeping the
//! interactive prompt out of the core.
//!
//! The catalog is an embedded semicolon-delimited table, parsed once per
//! process.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use tracing::debug;

use crate::error::{Result, SampleError};
use crate::geometry::BoundingBox;

/// A resolved sampling region: display name plus canonical bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub name: String,
    pub bbox: BoundingBox,
}

/// Capability for choosing among sub-regions of a composite region code.
///
/// Injected so the CLI can prompt interactively while tests and library
/// embedders stay deterministic.
pub trait RegionSelector {
    /// Choose one of `options`, returning its index.
    ///
    /// # Errors
    /// Returns [`SampleError::Selection`] if the choice cannot be obtained.
    fn choose(&self, prompt: &str, options: &[&str]) -> Result<usize>;
}

/// Selector that always picks the first option (the whole region).
///
/// The library default for non-interactive use.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstChoice;

impl RegionSelector for FirstChoice {
    fn choose(&self, _prompt: &str, _options: &[&str]) -> Result<usize> {
        Ok(0)
    }
}

/// Selector fixed to a given option index, for tests and scripted runs.
#[derive(Debug, Clone, Copy)]
pub struct FixedSelection(pub usize);

impl RegionSelector for FixedSelection {
    fn choose(&self, _prompt: &str, options: &[&str]) -> Result<usize> {
        if self.0 >= options.len() {
            return Err(SampleError::Selection(format!(
                "fixed selection {} out of range (have {} options)",
                self.0,
                options.len()
            )));
        }
        Ok(self.0)
    }
}

/// Composite codes and the sub-region codes offered for them. The first
/// entry is always the whole region itself.
const COMPOSITE_REGIONS: &[(&str, &[&str])] = &[(
    "ESP",
    &["ESP", "ESP_CANARY", "ESP_BALEARIC", "ESP_PENINSULA"],
)];

static CATALOG: Lazy<HashMap<&'static str, Region>> = Lazy::new(|| {
    parse_catalog(include_str!("../data/countries.txt"))
        .expect("embedded region catalog is well-formed")
});

/// Parse a `ISO3;Name;lat_min;lat_max;lon_min;lon_max` table. The first line
/// is a header and is skipped.
fn parse_catalog(text: &'static str) -> Result<HashMap<&'static str, Region>> {
    let mut catalog = HashMap::new();
    for line in text.lines().skip(1) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(';').collect();
        if fields.len() != 6 {
            return Err(SampleError::Selection(format!(
                "malformed catalog line: {line}"
            )));
        }
        let parse = |s: &str| {
            s.parse::<f64>()
                .map_err(|_| SampleError::Selection(format!("malformed catalog number: {s}")))
        };
        let bbox = BoundingBox::new(
            parse(fields[2])?,
            parse(fields[3])?,
            parse(fields[4])?,
            parse(fields[5])?,
        )?;
        catalog.insert(
            fields[0],
            Region {
                name: fields[1].to_string(),
                bbox,
            },
        );
    }
    Ok(catalog)
}

/// Look up a region code in the static catalog.
///
/// Composite codes (currently `ESP`) present their sub-regions through
/// `selector`; the chosen sub-region's bounding box replaces the country's.
///
/// # Errors
/// Returns [`SampleError::RegionNotFound`] for unknown codes, or
/// [`SampleError::Selection`] if the selector fails.
pub fn resolve_region(code: &str, selector: &dyn RegionSelector) -> Result<Region> {
    let region = CATALOG
        .get(code)
        .ok_or_else(|| SampleError::RegionNotFound(code.to_string()))?;

    let Some((_, sub_codes)) = COMPOSITE_REGIONS.iter().find(|(c, _)| *c == code) else {
        return Ok(region.clone());
    };

    let sub_regions = sub_codes
        .iter()
        .map(|sub| {
            CATALOG.get(sub).ok_or_else(|| {
                SampleError::Selection(format!("sub-region {sub} of {code} missing from catalog"))
            })
        })
        .collect::<Result<Vec<&Region>>>()?;

    let labels: Vec<&str> = sub_regions.iter().map(|r| r.name.as_str()).collect();
    let choice = selector.choose(
        &format!("{} has named sub-areas. Extract data for:", region.name),
        &labels,
    )?;
    let chosen = sub_regions.get(choice).ok_or_else(|| {
        SampleError::Selection(format!(
            "selected option {choice} out of range (have {} sub-regions)",
            sub_regions.len()
        ))
    })?;
    debug!(code, chosen = %chosen.name, "resolved composite region");
    Ok((*chosen).clone())
}

/// Build a region directly from explicit bounds.
///
/// # Errors
/// Returns [`SampleError::IncompleteBoundingBox`] if any bound is missing,
/// or [`SampleError::InvalidBoundingBox`] if the ordering is wrong.
pub fn resolve_bounds(
    min_lat: Option<f64>,
    max_lat: Option<f64>,
    min_lon: Option<f64>,
    max_lon: Option<f64>,
) -> Result<Region> {
    let bbox = BoundingBox::from_parts(min_lat, max_lat, min_lon, max_lon)?;
    Ok(Region {
        name: "custom area".to_string(),
        bbox,
    })
}
