//! Derived metric conversions.
//!
//! Radiance becomes magnitudes per square arcsecond (mpsas), which in turn
//! maps onto a continuous extension of the 9-step Bortle sky classification.
//! Both conversions are pure and applied lazily per record at export time;
//! raw samples are never mutated.

use clap::ValueEnum;

/// mpsas reference break points for integer Bortle tiers 1 through 8.
/// A 9th tier extends below 17.80. These values (and the half-open bracket
/// inequality in [`mpsas_to_bortle`]) are load-bearing for compatibility
/// with previously exported datasets; do not adjust them.
const MPSAS_BREAKS: [f64; 8] = [21.89, 21.69, 21.25, 20.49, 19.50, 18.94, 18.38, 17.80];

/// Convert V-band radiance to magnitudes per square arcsecond.
///
/// `mpsas = -2.5 * log10(radiance) + 20.7233`. The constant follows from
/// 0 mpsas corresponding to a radiance of 4.0e-8 W/cm2/sr in the V band.
/// `radiance` must be positive; the extractor guarantees this for the
/// radiance domain.
#[must_use]
pub fn radiance_to_mpsas(radiance: f64) -> f64 {
    -2.5 * radiance.log10() + 20.7233
}

/// Map an mpsas reading onto the continuous Bortle scale, rounded to one
/// decimal place.
///
/// Readings darker than the first break point clamp to 1.0 and readings at
/// or below the last clamp to 9.0; in between, the value is interpolated
/// linearly inside the bracketing pair `breaks[i+1] < mpsas <= breaks[i]`.
#[must_use]
pub fn mpsas_to_bortle(mpsas: f64) -> f64 {
    if mpsas > MPSAS_BREAKS[0] {
        return 1.0;
    }
    if mpsas <= MPSAS_BREAKS[7] {
        return 9.0;
    }

    for i in 0..MPSAS_BREAKS.len() - 1 {
        if MPSAS_BREAKS[i + 1] < mpsas && mpsas <= MPSAS_BREAKS[i] {
            // Consecutive integer tiers, so the interpolation slope is
            // 1 / (breaks[i+1] - breaks[i])
            let bortle =
                (i + 1) as f64 + (mpsas - MPSAS_BREAKS[i]) / (MPSAS_BREAKS[i + 1] - MPSAS_BREAKS[i]);
            return (bortle * 10.0).round() / 10.0;
        }
    }

    // Finite values in (17.80, 21.89] always bracket above
    9.0
}

/// The physical quantity a raster holds, with the derived metrics each
/// quantity carries into exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MetricDomain {
    /// Night-sky radiance; derives mpsas and continuous Bortle.
    Radiance,
    /// Terrain elevation; exported as-is.
    Elevation,
}

impl MetricDomain {
    /// Column name of the raw value in exports.
    #[must_use]
    pub fn raw_field(&self) -> &'static str {
        match self {
            Self::Radiance => "Radiance",
            Self::Elevation => "Elevation",
        }
    }

    /// Column names of the derived metrics, in export order.
    #[must_use]
    pub fn derived_fields(&self) -> &'static [&'static str] {
        match self {
            Self::Radiance => &["mpsas", "Bortle"],
            Self::Elevation => &[],
        }
    }

    /// Compute the derived metrics for one raw reading, paired with their
    /// field names in export order.
    #[must_use]
    pub fn derive(&self, raw_value: f64) -> Vec<(&'static str, f64)> {
        match self {
            Self::Radiance => {
                let mpsas = radiance_to_mpsas(raw_value);
                vec![("mpsas", mpsas), ("Bortle", mpsas_to_bortle(mpsas))]
            }
            Self::Elevation => Vec::new(),
        }
    }
}
