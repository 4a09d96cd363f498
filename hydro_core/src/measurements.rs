//! # Field Measurement Records
//!
//! The raw records collected at a river-study site: cross-sectional depth
//! soundings, float-timing velocity runs, and sediment samples. All types
//! are JSON-serializable and validated at construction; downstream
//! calculators may assume validated inputs.
//!
//! Units are metric throughout (m, s, mm) and not configurable.
//!
//! ## Example
//!
//! ```rust
//! use hydro_core::measurements::{MeasurementPoint, VelocityMeasurement};
//!
//! let point = MeasurementPoint::new(1, 0.0, 0.0).unwrap();
//! assert_eq!(point.depth_m, 0.0);
//!
//! let run = VelocityMeasurement::new(10.0, 10.0).unwrap();
//! assert_eq!(run.velocity_ms(), 1.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{HydroError, HydroResult};

/// A single depth sounding across the channel cross-section.
///
/// Points are ordered by `point_number` and must be monotonically
/// non-decreasing in `distance_from_bank_m` (sequence-level check lives in
/// [`crate::site::Site::validate`]). By field convention the first and last
/// points sit at the water's edge with zero depth.
///
/// ## JSON Example
///
/// ```json
/// { "point_number": 3, "distance_from_bank_m": 1.5, "depth_m": 0.42 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasurementPoint {
    /// Position in the cross-section sequence (1-based)
    pub point_number: u32,

    /// Distance from the near bank in metres
    pub distance_from_bank_m: f64,

    /// Water depth at this point in metres
    pub depth_m: f64,
}

impl MeasurementPoint {
    /// Create a validated measurement point.
    pub fn new(point_number: u32, distance_from_bank_m: f64, depth_m: f64) -> HydroResult<Self> {
        let point = MeasurementPoint {
            point_number,
            distance_from_bank_m,
            depth_m,
        };
        point.validate()?;
        Ok(point)
    }

    /// Validate this point in isolation (ordering is checked per-site).
    pub fn validate(&self) -> HydroResult<()> {
        if self.point_number < 1 {
            return Err(HydroError::invalid_measurement(
                "point_number",
                self.point_number.to_string(),
                "Point number must be 1 or greater",
            ));
        }
        if !self.distance_from_bank_m.is_finite() || self.distance_from_bank_m < 0.0 {
            return Err(HydroError::invalid_measurement(
                "distance_from_bank_m",
                self.distance_from_bank_m.to_string(),
                "Distance from bank must be non-negative",
            ));
        }
        if !self.depth_m.is_finite() || self.depth_m < 0.0 {
            return Err(HydroError::invalid_measurement(
                "depth_m",
                self.depth_m.to_string(),
                "Depth must be non-negative",
            ));
        }
        Ok(())
    }
}

/// A float-timing velocity run: how long a float took to travel a known
/// distance along the surface.
///
/// The velocity itself is derived, not stored. A run with zero time or
/// distance is a pending measurement (field sheet not yet filled in), which
/// reads as velocity `0.0` rather than an error.
///
/// ## JSON Example
///
/// ```json
/// { "time_s": 12.4, "distance_m": 10.0 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VelocityMeasurement {
    /// Travel time in seconds
    pub time_s: f64,

    /// Travel distance in metres
    pub distance_m: f64,
}

impl VelocityMeasurement {
    /// Create a validated velocity run.
    ///
    /// Zero values are accepted (pending measurement); negatives are not.
    pub fn new(time_s: f64, distance_m: f64) -> HydroResult<Self> {
        let run = VelocityMeasurement { time_s, distance_m };
        run.validate()?;
        Ok(run)
    }

    /// Validate this run.
    pub fn validate(&self) -> HydroResult<()> {
        if !self.time_s.is_finite() || self.time_s < 0.0 {
            return Err(HydroError::invalid_measurement(
                "time_s",
                self.time_s.to_string(),
                "Time must be non-negative",
            ));
        }
        if !self.distance_m.is_finite() || self.distance_m < 0.0 {
            return Err(HydroError::invalid_measurement(
                "distance_m",
                self.distance_m.to_string(),
                "Distance must be non-negative",
            ));
        }
        Ok(())
    }

    /// Derived surface velocity in m/s.
    ///
    /// `distance / time` when both are positive, `0.0` otherwise
    /// (pending measurement sentinel, guarded against division by zero).
    pub fn velocity_ms(&self) -> f64 {
        if self.time_s > 0.0 && self.distance_m > 0.0 {
            self.distance_m / self.time_s
        } else {
            0.0
        }
    }
}

/// Powers Roundness Scale class for a sediment grain.
///
/// A closed 6-point ordinal scale; values outside 1..=6 are invalid input
/// and rejected at the boundary via [`Roundness::try_from`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Roundness {
    VeryAngular,
    Angular,
    SubAngular,
    SubRounded,
    Rounded,
    WellRounded,
}

impl Roundness {
    /// Numeric class on the Powers scale, 1..=6.
    pub fn class(&self) -> u8 {
        match self {
            Roundness::VeryAngular => 1,
            Roundness::Angular => 2,
            Roundness::SubAngular => 3,
            Roundness::SubRounded => 4,
            Roundness::Rounded => 5,
            Roundness::WellRounded => 6,
        }
    }

    /// Field-sheet label for this class.
    pub fn label(&self) -> &'static str {
        match self {
            Roundness::VeryAngular => "Very Angular",
            Roundness::Angular => "Angular",
            Roundness::SubAngular => "Sub-angular",
            Roundness::SubRounded => "Sub-rounded",
            Roundness::Rounded => "Rounded",
            Roundness::WellRounded => "Well-rounded",
        }
    }

    /// All classes in scale order (class 1 first).
    pub fn all() -> [Roundness; 6] {
        [
            Roundness::VeryAngular,
            Roundness::Angular,
            Roundness::SubAngular,
            Roundness::SubRounded,
            Roundness::Rounded,
            Roundness::WellRounded,
        ]
    }
}

impl TryFrom<u8> for Roundness {
    type Error = HydroError;

    fn try_from(value: u8) -> HydroResult<Self> {
        match value {
            1 => Ok(Roundness::VeryAngular),
            2 => Ok(Roundness::Angular),
            3 => Ok(Roundness::SubAngular),
            4 => Ok(Roundness::SubRounded),
            5 => Ok(Roundness::Rounded),
            6 => Ok(Roundness::WellRounded),
            other => Err(HydroError::invalid_measurement(
                "roundness",
                other.to_string(),
                "Roundness class must be between 1 and 6 (Powers scale)",
            )),
        }
    }
}

/// A single sediment grain sample: long-axis size and roundness class.
///
/// ## JSON Example
///
/// ```json
/// { "size_mm": 45.0, "roundness": "SubRounded" }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SedimentMeasurement {
    /// Grain size (long axis) in millimetres
    pub size_mm: f64,

    /// Powers roundness class
    pub roundness: Roundness,
}

impl SedimentMeasurement {
    /// Create a validated sediment sample.
    pub fn new(size_mm: f64, roundness: Roundness) -> HydroResult<Self> {
        let sample = SedimentMeasurement { size_mm, roundness };
        sample.validate()?;
        Ok(sample)
    }

    /// Validate this sample.
    pub fn validate(&self) -> HydroResult<()> {
        if !self.size_mm.is_finite() || self.size_mm < 0.0 {
            return Err(HydroError::invalid_measurement(
                "size_mm",
                self.size_mm.to_string(),
                "Grain size must be non-negative",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_rejects_negative_depth() {
        let err = MeasurementPoint::new(1, 0.5, -0.2).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_MEASUREMENT");
    }

    #[test]
    fn test_point_rejects_zero_point_number() {
        assert!(MeasurementPoint::new(0, 0.0, 0.0).is_err());
    }

    #[test]
    fn test_velocity_derivation() {
        let run = VelocityMeasurement::new(10.0, 10.0).unwrap();
        assert_eq!(run.velocity_ms(), 1.0);
    }

    #[test]
    fn test_velocity_pending_is_zero_not_infinity() {
        let run = VelocityMeasurement::new(0.0, 10.0).unwrap();
        assert_eq!(run.velocity_ms(), 0.0);

        let blank = VelocityMeasurement::new(0.0, 0.0).unwrap();
        assert_eq!(blank.velocity_ms(), 0.0);
    }

    #[test]
    fn test_roundness_scale_bounds() {
        assert_eq!(Roundness::try_from(1).unwrap(), Roundness::VeryAngular);
        assert_eq!(Roundness::try_from(6).unwrap(), Roundness::WellRounded);
        assert!(Roundness::try_from(0).is_err());
        assert!(Roundness::try_from(7).is_err());
    }

    #[test]
    fn test_roundness_class_roundtrip() {
        for class in 1..=6u8 {
            let roundness = Roundness::try_from(class).unwrap();
            assert_eq!(roundness.class(), class);
        }
    }

    #[test]
    fn test_sediment_serialization() {
        let sample = SedimentMeasurement::new(45.0, Roundness::SubRounded).unwrap();
        let json = serde_json::to_string(&sample).unwrap();
        let roundtrip: SedimentMeasurement = serde_json::from_str(&json).unwrap();
        assert_eq!(sample, roundtrip);
    }
}
