//! # Site Metrics
//!
//! Bundles the geometry, flow, and sediment calculators into a single
//! per-site metrics record. `SiteMetrics` is a pure function's output:
//! recomputed on demand from the site, never persisted independently.
//!
//! ## Example
//!
//! ```rust
//! use hydro_core::calculations::compute_site_metrics;
//! use hydro_core::site::Site;
//!
//! // A brand-new site computes to all-zero metrics, not an error.
//! let site = Site::new(1, 4.0).unwrap();
//! let metrics = compute_site_metrics(&site);
//! assert_eq!(metrics.cross_sectional_area_m2, 0.0);
//! assert_eq!(metrics.discharge_m3s, 0.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::{flow, geometry, sediment};
use crate::site::Site;

/// Derived hydrology metrics for one site.
///
/// All values are metric. Missing measurement sub-collections degrade to
/// the documented zero/empty defaults because sites fill in incrementally
/// across a multi-step data-entry workflow.
///
/// ## JSON Example
///
/// ```json
/// {
///   "site_number": 1,
///   "cross_sectional_area_m2": 2.0,
///   "average_depth_m": 0.33,
///   "max_depth_m": 1.0,
///   "average_velocity_ms": 1.5,
///   "discharge_m3s": 3.0,
///   "wetted_perimeter_m": 4.67,
///   "sediment_distribution": [0, 0, 2, 0, 1, 0],
///   "average_sediment_size_mm": 22.5
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteMetrics {
    /// Which site these metrics describe
    pub site_number: u32,

    /// Cross-sectional area (m²), trapezoidal rule
    pub cross_sectional_area_m2: f64,

    /// Mean depth over all recorded points (m)
    pub average_depth_m: f64,

    /// Deepest recorded point (m)
    pub max_depth_m: f64,

    /// Mean of completed velocity runs (m/s)
    pub average_velocity_ms: f64,

    /// Discharge Q = A × V (m³/s)
    pub discharge_m3s: f64,

    /// Wetted perimeter, rectangular approximation (m)
    pub wetted_perimeter_m: f64,

    /// Sample counts per Powers roundness class (index 0 = class 1)
    pub sediment_distribution: [u32; 6],

    /// Mean grain size (mm)
    pub average_sediment_size_mm: f64,
}

/// Compute all derived metrics for a site.
///
/// Pure composition of the geometry, flow, and sediment calculators.
/// There is no partial-failure mode: any missing sub-collection yields
/// the corresponding zero/empty defaults so an in-progress site still
/// renders sensibly.
pub fn compute_site_metrics(site: &Site) -> SiteMetrics {
    let cross_sectional_area_m2 = geometry::cross_sectional_area(&site.measurement_points);
    let average_depth_m = geometry::average_depth(&site.measurement_points);
    let average_velocity_ms = flow::average_velocity(&site.velocity_measurements);

    SiteMetrics {
        site_number: site.site_number,
        cross_sectional_area_m2,
        average_depth_m,
        max_depth_m: geometry::max_depth(&site.measurement_points),
        average_velocity_ms,
        discharge_m3s: flow::discharge(cross_sectional_area_m2, average_velocity_ms),
        wetted_perimeter_m: geometry::wetted_perimeter(site.river_width_m, average_depth_m),
        sediment_distribution: sediment::distribution(&site.sediment_measurements),
        average_sediment_size_mm: sediment::average_size(&site.sediment_measurements),
    }
}
