//! # Channel Geometry Calculations
//!
//! Converts an ordered cross-sectional depth profile into area, depth
//! statistics, and the wetted-perimeter quick-reference value.
//!
//! ## Assumptions
//!
//! - Points are sorted ascending by distance from bank (enforced at the
//!   [`crate::site::Site::validate`] boundary)
//! - Depth is measured below a flat water surface at y = 0
//! - Metric units throughout (m, m²)
//!
//! ## Example
//!
//! ```rust
//! use hydro_core::calculations::geometry;
//! use hydro_core::measurements::MeasurementPoint;
//!
//! let profile = vec![
//!     MeasurementPoint { point_number: 1, distance_from_bank_m: 0.0, depth_m: 0.0 },
//!     MeasurementPoint { point_number: 2, distance_from_bank_m: 2.0, depth_m: 1.0 },
//!     MeasurementPoint { point_number: 3, distance_from_bank_m: 4.0, depth_m: 0.0 },
//! ];
//!
//! assert_eq!(geometry::cross_sectional_area(&profile), 2.0);
//! assert_eq!(geometry::max_depth(&profile), 1.0);
//! ```

use crate::measurements::MeasurementPoint;

/// Cross-sectional area in m² by the composite trapezoidal rule.
///
/// For each adjacent pair of points the segment contributes
/// `width × (d1 + d2) / 2`. Fewer than two points is an incomplete
/// profile with zero measured area, not an error.
pub fn cross_sectional_area(points: &[MeasurementPoint]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    points
        .windows(2)
        .map(|pair| {
            let segment_width = pair[1].distance_from_bank_m - pair[0].distance_from_bank_m;
            segment_width * (pair[0].depth_m + pair[1].depth_m) / 2.0
        })
        .sum()
}

/// Arithmetic mean depth in metres over **all** recorded points.
///
/// Zero-depth bank-edge points are included. This convention keeps the
/// value consistent with the wetted-perimeter approximation below and
/// matches the reference field sheets; do not switch to a wetted-points
/// mean without re-baselining report fixtures.
pub fn average_depth(points: &[MeasurementPoint]) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    points.iter().map(|p| p.depth_m).sum::<f64>() / points.len() as f64
}

/// Maximum recorded depth in metres, `0.0` for an empty profile.
pub fn max_depth(points: &[MeasurementPoint]) -> f64 {
    points.iter().map(|p| p.depth_m).fold(0.0, f64::max)
}

/// Wetted perimeter in metres, rectangular-channel approximation:
/// `width + 2 × average depth`.
///
/// This is deliberately not a true arc-length integral. The coarse
/// approximation is the published formula for this kind of fieldwork and
/// downstream report values must match it.
pub fn wetted_perimeter(river_width_m: f64, average_depth_m: f64) -> f64 {
    river_width_m + 2.0 * average_depth_m
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(n: u32, distance: f64, depth: f64) -> MeasurementPoint {
        MeasurementPoint {
            point_number: n,
            distance_from_bank_m: distance,
            depth_m: depth,
        }
    }

    #[test]
    fn test_trapezoid_fixture() {
        // 2×(0+1)/2 + 2×(1+0)/2 = 2
        let profile = vec![point(1, 0.0, 0.0), point(2, 2.0, 1.0), point(3, 4.0, 0.0)];
        assert_eq!(cross_sectional_area(&profile), 2.0);
    }

    #[test]
    fn test_flat_zero_profile_has_zero_area() {
        let profile = vec![point(1, 0.0, 0.0), point(2, 7.5, 0.0)];
        assert_eq!(cross_sectional_area(&profile), 0.0);
    }

    #[test]
    fn test_fewer_than_two_points_is_zero() {
        assert_eq!(cross_sectional_area(&[]), 0.0);
        assert_eq!(cross_sectional_area(&[point(1, 1.0, 0.5)]), 0.0);
    }

    #[test]
    fn test_area_scales_linearly_with_depth() {
        let profile = vec![point(1, 0.0, 0.0), point(2, 2.0, 1.0), point(3, 4.0, 0.5)];
        let doubled: Vec<MeasurementPoint> = profile
            .iter()
            .map(|p| point(p.point_number, p.distance_from_bank_m, p.depth_m * 2.0))
            .collect();
        let base = cross_sectional_area(&profile);
        assert!((cross_sectional_area(&doubled) - 2.0 * base).abs() < 1e-12);
    }

    #[test]
    fn test_area_is_deterministic() {
        let profile = vec![point(1, 0.0, 0.0), point(2, 1.3, 0.7), point(3, 2.9, 0.4)];
        assert_eq!(
            cross_sectional_area(&profile),
            cross_sectional_area(&profile.clone())
        );
    }

    #[test]
    fn test_average_depth_includes_bank_points() {
        let profile = vec![point(1, 0.0, 0.0), point(2, 2.0, 1.2), point(3, 4.0, 0.0)];
        assert!((average_depth(&profile) - 0.4).abs() < 1e-12);
        assert_eq!(average_depth(&[]), 0.0);
    }

    #[test]
    fn test_max_depth() {
        let profile = vec![point(1, 0.0, 0.2), point(2, 2.0, 1.2), point(3, 4.0, 0.6)];
        assert_eq!(max_depth(&profile), 1.2);
        assert_eq!(max_depth(&[]), 0.0);
    }

    #[test]
    fn test_wetted_perimeter_formula() {
        assert_eq!(wetted_perimeter(4.0, 0.4), 4.8);
        assert_eq!(wetted_perimeter(3.0, 0.0), 3.0);
    }
}
