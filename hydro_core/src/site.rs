//! # Study Site
//!
//! A [`Site`] is one surveyed cross-section of the river: its channel
//! width plus the three measurement sub-collections (depth profile,
//! velocity runs, sediment samples).
//!
//! Sites are populated incrementally during fieldwork, so empty
//! sub-collections are a normal state, not an error. Validation enforces
//! only the invariants that would make computed metrics meaningless:
//! positive width, non-negative readings, and a monotone depth profile.
//!
//! ## Example
//!
//! ```rust
//! use hydro_core::site::Site;
//! use hydro_core::measurements::MeasurementPoint;
//!
//! let mut site = Site::new(1, 4.0).unwrap();
//! site.measurement_points = vec![
//!     MeasurementPoint { point_number: 1, distance_from_bank_m: 0.0, depth_m: 0.0 },
//!     MeasurementPoint { point_number: 2, distance_from_bank_m: 2.0, depth_m: 1.0 },
//!     MeasurementPoint { point_number: 3, distance_from_bank_m: 4.0, depth_m: 0.0 },
//! ];
//! assert!(site.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{HydroError, HydroResult};
use crate::measurements::{MeasurementPoint, SedimentMeasurement, VelocityMeasurement};

/// One surveyed cross-section of the river.
///
/// `site_number` orders sites downstream (site 1 is furthest upstream).
/// By field convention the depth profile starts and ends at the water's
/// edge (distance 0 and `river_width_m`, depth 0), but partially entered
/// profiles are representable and compute to sensible partial metrics.
///
/// ## JSON Example
///
/// ```json
/// {
///   "site_number": 1,
///   "river_width_m": 4.0,
///   "measurement_points": [
///     { "point_number": 1, "distance_from_bank_m": 0.0, "depth_m": 0.0 },
///     { "point_number": 2, "distance_from_bank_m": 2.0, "depth_m": 1.0 },
///     { "point_number": 3, "distance_from_bank_m": 4.0, "depth_m": 0.0 }
///   ],
///   "velocity_measurements": [
///     { "time_s": 12.4, "distance_m": 10.0 }
///   ],
///   "sediment_measurements": [
///     { "size_mm": 45.0, "roundness": "SubRounded" }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    /// Downstream ordering number (1-based)
    pub site_number: u32,

    /// Channel width at the water surface in metres
    pub river_width_m: f64,

    /// Cross-sectional depth profile, ordered by point number
    #[serde(default)]
    pub measurement_points: Vec<MeasurementPoint>,

    /// Float-timing velocity runs
    #[serde(default)]
    pub velocity_measurements: Vec<VelocityMeasurement>,

    /// Sediment grain samples
    #[serde(default)]
    pub sediment_measurements: Vec<SedimentMeasurement>,
}

impl Site {
    /// Create a new empty site with a validated width.
    pub fn new(site_number: u32, river_width_m: f64) -> HydroResult<Self> {
        let site = Site {
            site_number,
            river_width_m,
            measurement_points: Vec::new(),
            velocity_measurements: Vec::new(),
            sediment_measurements: Vec::new(),
        };
        site.validate()?;
        Ok(site)
    }

    /// Validate the site and all of its measurement records.
    ///
    /// Checks, in order:
    /// - `site_number >= 1` and `river_width_m > 0`
    /// - every sub-record validates in isolation
    /// - depth-profile distances are monotonically non-decreasing
    ///
    /// Empty sub-collections are valid (incremental data entry).
    pub fn validate(&self) -> HydroResult<()> {
        if self.site_number < 1 {
            return Err(HydroError::invalid_measurement(
                "site_number",
                self.site_number.to_string(),
                "Site number must be 1 or greater",
            ));
        }
        if !self.river_width_m.is_finite() || self.river_width_m <= 0.0 {
            return Err(HydroError::invalid_measurement(
                "river_width_m",
                self.river_width_m.to_string(),
                "River width must be positive",
            ));
        }

        for point in &self.measurement_points {
            point.validate()?;
        }
        for run in &self.velocity_measurements {
            run.validate()?;
        }
        for sample in &self.sediment_measurements {
            sample.validate()?;
        }

        // A cross-section walks bank to bank; going backwards is a
        // transcription error, not a valid profile.
        for pair in self.measurement_points.windows(2) {
            if pair[1].distance_from_bank_m < pair[0].distance_from_bank_m {
                return Err(HydroError::invalid_measurement(
                    "distance_from_bank_m",
                    pair[1].distance_from_bank_m.to_string(),
                    format!(
                        "Distances must not decrease (point {} is before point {})",
                        pair[1].point_number, pair[0].point_number
                    ),
                ));
            }
        }

        Ok(())
    }

    /// Number of depth soundings recorded so far.
    pub fn point_count(&self) -> usize {
        self.measurement_points.len()
    }

    /// True if no measurements of any kind have been entered.
    pub fn is_empty(&self) -> bool {
        self.measurement_points.is_empty()
            && self.velocity_measurements.is_empty()
            && self.sediment_measurements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurements::Roundness;

    fn point(n: u32, distance: f64, depth: f64) -> MeasurementPoint {
        MeasurementPoint {
            point_number: n,
            distance_from_bank_m: distance,
            depth_m: depth,
        }
    }

    #[test]
    fn test_new_site_is_empty_and_valid() {
        let site = Site::new(1, 4.0).unwrap();
        assert!(site.is_empty());
        assert_eq!(site.point_count(), 0);
    }

    #[test]
    fn test_rejects_non_positive_width() {
        assert!(Site::new(1, 0.0).is_err());
        assert!(Site::new(1, -2.5).is_err());
    }

    #[test]
    fn test_rejects_non_monotonic_profile() {
        let mut site = Site::new(1, 4.0).unwrap();
        site.measurement_points = vec![point(1, 0.0, 0.0), point(2, 2.0, 1.0), point(3, 1.5, 0.5)];
        let err = site.validate().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_MEASUREMENT");
    }

    #[test]
    fn test_equal_distances_allowed() {
        // Repeated soundings at the same station are legitimate.
        let mut site = Site::new(1, 4.0).unwrap();
        site.measurement_points = vec![point(1, 0.0, 0.0), point(2, 2.0, 1.0), point(3, 2.0, 1.1)];
        assert!(site.validate().is_ok());
    }

    #[test]
    fn test_validates_sub_records() {
        let mut site = Site::new(1, 4.0).unwrap();
        site.measurement_points = vec![point(1, 0.0, -1.0)];
        assert!(site.validate().is_err());
    }

    #[test]
    fn test_site_json_roundtrip() {
        let mut site = Site::new(2, 6.5).unwrap();
        site.measurement_points = vec![point(1, 0.0, 0.0), point(2, 3.0, 0.8)];
        site.sediment_measurements = vec![SedimentMeasurement {
            size_mm: 12.0,
            roundness: Roundness::Angular,
        }];

        let json = serde_json::to_string(&site).unwrap();
        let roundtrip: Site = serde_json::from_str(&json).unwrap();
        assert_eq!(site, roundtrip);
    }

    #[test]
    fn test_missing_collections_default_empty() {
        // Older files and partial entries omit the sub-collections.
        let site: Site = serde_json::from_str(r#"{"site_number":1,"river_width_m":3.0}"#).unwrap();
        assert!(site.is_empty());
        assert!(site.validate().is_ok());
    }
}
