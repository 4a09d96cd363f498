//! # Cross-Section Chart Specification
//!
//! A declarative description of the cross-section profile chart: plotted
//! series only, no pixels. The renderer (typst, a GUI canvas, anything)
//! draws whatever coordinates appear here, so the series must be
//! self-consistent with the geometry calculator's outputs.
//!
//! Coordinates use the field convention of the chart: x is distance from
//! bank in metres, y is elevation relative to the water surface at 0, so
//! bed points plot at `-depth`.

use serde::{Deserialize, Serialize};

use crate::calculations::geometry;
use crate::site::Site;

/// Depth (m) the fill polygon extends below the deepest sounding, so the
/// "underground" region reads as solid bank rather than a thin sliver.
const FILL_MARGIN_M: f64 = 0.5;

/// One plotted coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Distance from the near bank (m)
    pub x_m: f64,
    /// Elevation relative to the water surface (m, bed is negative)
    pub y_m: f64,
}

impl ChartPoint {
    pub fn new(x_m: f64, y_m: f64) -> Self {
        ChartPoint { x_m, y_m }
    }
}

/// Declarative series list for one site's cross-section profile chart.
///
/// The fill region is a closed polygon: the bed line with a point at
/// `(0, floor_y)` prepended and `(width, floor_y)` appended, where
/// `floor_y = -(max_depth + 0.5)`. This double-ended construction is the
/// required visual convention; it guarantees the shaded ground always
/// closes below the deepest sounding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    /// Bed profile, one point per sounding at `(distance, -depth)`
    pub bed_line: Vec<ChartPoint>,

    /// Water surface from `(0, 0)` to `(width, 0)`
    pub water_surface: [ChartPoint; 2],

    /// Closed polygon shading the ground below the bed line
    pub fill_region: Vec<ChartPoint>,

    /// Lower bound of the fill polygon: `-(max_depth + 0.5)`
    pub floor_y_m: f64,

    /// Channel width annotation drawn along the surface line (m)
    pub annotated_width_m: f64,
}

impl ChartSpec {
    /// Build the cross-section chart series for a site.
    ///
    /// Total over partial input: a site without soundings produces an
    /// empty bed line and a fill polygon that is just the two floor
    /// corners (renderers draw nothing visible, which is correct for
    /// "no data yet").
    pub fn cross_section(site: &Site) -> ChartSpec {
        let width = site.river_width_m;
        let floor_y_m = -(geometry::max_depth(&site.measurement_points) + FILL_MARGIN_M);

        let bed_line: Vec<ChartPoint> = site
            .measurement_points
            .iter()
            .map(|p| ChartPoint::new(p.distance_from_bank_m, -p.depth_m))
            .collect();

        let mut fill_region = Vec::with_capacity(bed_line.len() + 2);
        fill_region.push(ChartPoint::new(0.0, floor_y_m));
        fill_region.extend(bed_line.iter().copied());
        fill_region.push(ChartPoint::new(width, floor_y_m));

        ChartSpec {
            bed_line,
            water_surface: [ChartPoint::new(0.0, 0.0), ChartPoint::new(width, 0.0)],
            fill_region,
            floor_y_m,
            annotated_width_m: width,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurements::MeasurementPoint;

    fn site_with_profile(width: f64, depths: &[(f64, f64)]) -> Site {
        let mut site = Site::new(1, width).unwrap();
        site.measurement_points = depths
            .iter()
            .enumerate()
            .map(|(i, (distance, depth))| MeasurementPoint {
                point_number: (i + 1) as u32,
                distance_from_bank_m: *distance,
                depth_m: *depth,
            })
            .collect();
        site
    }

    #[test]
    fn test_bed_line_negates_depth() {
        let site = site_with_profile(4.0, &[(0.0, 0.0), (2.0, 1.0), (4.0, 0.0)]);
        let chart = ChartSpec::cross_section(&site);
        assert_eq!(chart.bed_line[1], ChartPoint::new(2.0, -1.0));
    }

    #[test]
    fn test_fill_polygon_closes_below_max_depth() {
        let site = site_with_profile(4.0, &[(0.0, 0.0), (2.0, 1.0), (4.0, 0.0)]);
        let chart = ChartSpec::cross_section(&site);

        assert_eq!(chart.floor_y_m, -1.5);
        // Prepended and appended floor corners at the banks.
        assert_eq!(chart.fill_region.first().unwrap(), &ChartPoint::new(0.0, -1.5));
        assert_eq!(chart.fill_region.last().unwrap(), &ChartPoint::new(4.0, -1.5));
        assert_eq!(chart.fill_region.len(), site.measurement_points.len() + 2);
    }

    #[test]
    fn test_water_surface_spans_width() {
        let site = site_with_profile(6.5, &[(0.0, 0.0), (6.5, 0.0)]);
        let chart = ChartSpec::cross_section(&site);
        assert_eq!(chart.water_surface[0], ChartPoint::new(0.0, 0.0));
        assert_eq!(chart.water_surface[1], ChartPoint::new(6.5, 0.0));
        assert_eq!(chart.annotated_width_m, 6.5);
    }

    #[test]
    fn test_empty_profile_degrades() {
        let site = site_with_profile(3.0, &[]);
        let chart = ChartSpec::cross_section(&site);
        assert!(chart.bed_line.is_empty());
        assert_eq!(chart.floor_y_m, -0.5);
        assert_eq!(chart.fill_region.len(), 2);
    }
}
