//! # Sediment Calculations
//!
//! Aggregates sediment grain samples into a Powers-scale roundness
//! frequency distribution and an average grain size.
//!
//! ## Example
//!
//! ```rust
//! use hydro_core::calculations::sediment;
//! use hydro_core::measurements::{Roundness, SedimentMeasurement};
//!
//! let samples = vec![
//!     SedimentMeasurement { size_mm: 10.0, roundness: Roundness::SubAngular },
//!     SedimentMeasurement { size_mm: 30.0, roundness: Roundness::Rounded },
//! ];
//!
//! assert_eq!(sediment::distribution(&samples), [0, 0, 1, 0, 1, 0]);
//! assert_eq!(sediment::average_size(&samples), 20.0);
//! ```

use crate::measurements::SedimentMeasurement;

/// Count of samples per roundness class, indexed `class − 1`
/// (index 0 = Very Angular … index 5 = Well-rounded).
pub fn distribution(measurements: &[SedimentMeasurement]) -> [u32; 6] {
    let mut counts = [0u32; 6];
    for sample in measurements {
        counts[(sample.roundness.class() - 1) as usize] += 1;
    }
    counts
}

/// Arithmetic mean grain size in mm; `0.0` for an empty sample set.
///
/// Callers distinguishing "no data yet" from a true zero reading must
/// check the sample list is non-empty before treating `0.0` as
/// meaningful.
pub fn average_size(measurements: &[SedimentMeasurement]) -> f64 {
    if measurements.is_empty() {
        return 0.0;
    }
    measurements.iter().map(|m| m.size_mm).sum::<f64>() / measurements.len() as f64
}
