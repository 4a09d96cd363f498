//! # Flow Calculations
//!
//! Velocity statistics from float-timing runs, and discharge via the
//! continuity equation `Q = A·V`.
//!
//! ## Example
//!
//! ```rust
//! use hydro_core::calculations::flow;
//! use hydro_core::measurements::VelocityMeasurement;
//!
//! let runs = vec![
//!     VelocityMeasurement { time_s: 10.0, distance_m: 10.0 },
//!     VelocityMeasurement { time_s: 5.0, distance_m: 10.0 },
//! ];
//!
//! assert_eq!(flow::average_velocity(&runs), 1.5);
//! assert_eq!(flow::discharge(2.0, 1.5), 3.0);
//! ```

use crate::measurements::VelocityMeasurement;

/// Surface velocity in m/s for one timed run.
///
/// `distance / time` when the time is positive, `0.0` for a pending
/// (blank) measurement. Guarded so a zero time never produces infinity.
pub fn velocity(time_s: f64, distance_m: f64) -> f64 {
    if time_s > 0.0 {
        distance_m / time_s
    } else {
        0.0
    }
}

/// Arithmetic mean of all runs with a computed velocity above zero.
///
/// Pending runs (velocity 0) are excluded so half-filled field sheets do
/// not drag the site average down. No completed runs yields `0.0`.
pub fn average_velocity(measurements: &[VelocityMeasurement]) -> f64 {
    let velocities: Vec<f64> = measurements
        .iter()
        .map(|m| m.velocity_ms())
        .filter(|v| *v > 0.0)
        .collect();
    if velocities.is_empty() {
        return 0.0;
    }
    velocities.iter().sum::<f64>() / velocities.len() as f64
}

/// Discharge in m³/s by continuity: `Q = A × V`.
///
/// Inputs are metric (m², m/s); no unit conversion is performed.
pub fn discharge(cross_sectional_area_m2: f64, average_velocity_ms: f64) -> f64 {
    cross_sectional_area_m2 * average_velocity_ms
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(time: f64, distance: f64) -> VelocityMeasurement {
        VelocityMeasurement {
            time_s: time,
            distance_m: distance,
        }
    }

    #[test]
    fn test_velocity() {
        assert_eq!(velocity(10.0, 10.0), 1.0);
        assert_eq!(velocity(4.0, 10.0), 2.5);
    }

    #[test]
    fn test_velocity_zero_time_is_guarded() {
        let v = velocity(0.0, 10.0);
        assert_eq!(v, 0.0);
        assert!(v.is_finite());
    }

    #[test]
    fn test_average_velocity_skips_pending_runs() {
        let runs = vec![run(10.0, 10.0), run(0.0, 10.0), run(5.0, 10.0)];
        // Mean of 1.0 and 2.0; the pending run is excluded.
        assert_eq!(average_velocity(&runs), 1.5);
    }

    #[test]
    fn test_average_velocity_empty_and_all_pending() {
        assert_eq!(average_velocity(&[]), 0.0);
        assert_eq!(average_velocity(&[run(0.0, 10.0), run(0.0, 0.0)]), 0.0);
    }

    #[test]
    fn test_discharge() {
        assert_eq!(discharge(2.0, 1.5), 3.0);
        assert_eq!(discharge(0.0, 1.5), 0.0);
    }
}
