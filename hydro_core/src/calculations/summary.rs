//! # Study-Wide Summary
//!
//! Aggregates every site of a study into totals, averages, and
//! qualitative downstream-trend labels.
//!
//! Two different averaging conventions coexist here on purpose:
//!
//! - `average_velocity_ms` is the **mean of per-site averages**, not
//!   re-weighted by run count
//! - `average_sediment_size_mm` is the **pooled mean** over all samples
//!   from all sites, flattened
//!
//! Both match the reference field-sheet arithmetic; unifying them would
//! change reported numbers against existing fixtures.
//!
//! ## Example
//!
//! ```rust
//! use hydro_core::calculations::compute_study_summary;
//!
//! // Zero sites is a valid (empty) study, not an error.
//! let summary = compute_study_summary(&[]);
//! assert_eq!(summary.total_sites, 0);
//! assert_eq!(summary.average_velocity_ms, 0.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::{compute_site_metrics, sediment, SiteMetrics};
use crate::site::Site;

/// Relative change below which a downstream trend reads as stable.
const TREND_THRESHOLD: f64 = 0.05;

/// Direction of a metric between the most upstream and most downstream
/// site with data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    /// Metric grows downstream by more than the threshold
    Increasing,
    /// Metric shrinks downstream by more than the threshold
    Decreasing,
    /// Change within the threshold
    Stable,
    /// Fewer than two sites carry data for this metric
    InsufficientData,
}

impl Trend {
    /// Classify the relative change between an upstream and a
    /// downstream value. Values of zero mean "no data" for that end.
    fn classify(upstream: f64, downstream: f64) -> Trend {
        if upstream <= 0.0 || downstream <= 0.0 {
            return Trend::InsufficientData;
        }
        let relative = (downstream - upstream) / upstream;
        if relative > TREND_THRESHOLD {
            Trend::Increasing
        } else if relative < -TREND_THRESHOLD {
            Trend::Decreasing
        } else {
            Trend::Stable
        }
    }
}

/// Study-wide summary statistics.
///
/// ## JSON Example
///
/// ```json
/// {
///   "total_sites": 4,
///   "total_area_m2": 11.2,
///   "average_velocity_ms": 0.9,
///   "total_discharge_m3s": 10.1,
///   "average_sediment_size_mm": 24.3,
///   "sediment_trend": "Decreasing",
///   "velocity_trend": "Increasing",
///   "sediment_trend_label": "Downstream fining: ...",
///   "velocity_trend_label": "Velocity increases downstream: ..."
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudySummary {
    /// Number of sites in the study
    pub total_sites: usize,

    /// Σ cross-sectional area over all sites (m²)
    pub total_area_m2: f64,

    /// Mean of per-site average velocities (m/s)
    pub average_velocity_ms: f64,

    /// Σ discharge over all sites (m³/s)
    pub total_discharge_m3s: f64,

    /// Pooled mean grain size over every sample of every site (mm)
    pub average_sediment_size_mm: f64,

    /// Downstream grain-size trend
    pub sediment_trend: Trend,

    /// Downstream velocity trend
    pub velocity_trend: Trend,

    /// Human-readable sediment trend description
    pub sediment_trend_label: String,

    /// Human-readable velocity trend description
    pub velocity_trend_label: String,
}

/// Compute the study-wide summary over sites ordered by site number.
///
/// Total over partial input: an empty slice (or sites with no
/// measurements) produces all-zero defaults. Every mean guards its
/// denominator, so no input produces NaN or a panic.
pub fn compute_study_summary(sites: &[Site]) -> StudySummary {
    let metrics: Vec<_> = sites.iter().map(compute_site_metrics).collect();

    let total_area_m2: f64 = metrics.iter().map(|m| m.cross_sectional_area_m2).sum();
    let total_discharge_m3s: f64 = metrics.iter().map(|m| m.discharge_m3s).sum();

    // Mean of per-site means, deliberately not re-weighted by run count.
    let average_velocity_ms = if metrics.is_empty() {
        0.0
    } else {
        metrics.iter().map(|m| m.average_velocity_ms).sum::<f64>() / metrics.len() as f64
    };

    // Pooled mean over the flattened sample set, unlike velocity above.
    let all_samples: Vec<_> = sites
        .iter()
        .flat_map(|s| s.sediment_measurements.iter().copied())
        .collect();
    let average_sediment_size_mm = sediment::average_size(&all_samples);

    let (sediment_trend, sediment_trend_label) = sediment_trend(sites, &metrics);
    let (velocity_trend, velocity_trend_label) = velocity_trend(&metrics);

    StudySummary {
        total_sites: sites.len(),
        total_area_m2,
        average_velocity_ms,
        total_discharge_m3s,
        average_sediment_size_mm,
        sediment_trend,
        velocity_trend,
        sediment_trend_label,
        velocity_trend_label,
    }
}

/// Best-effort downstream sediment trend: compares the first and last
/// site (in site-number order) that carry sediment data.
fn sediment_trend(sites: &[Site], metrics: &[SiteMetrics]) -> (Trend, String) {
    let with_data: Vec<_> = metrics
        .iter()
        .zip(sites)
        .filter(|(_, s)| !s.sediment_measurements.is_empty())
        .collect();

    let (Some((first, _)), Some((last, _))) = (with_data.first(), with_data.last()) else {
        return (
            Trend::InsufficientData,
            "Not enough sediment data to classify a downstream trend".to_string(),
        );
    };
    if first.site_number == last.site_number {
        return (
            Trend::InsufficientData,
            "Not enough sediment data to classify a downstream trend".to_string(),
        );
    }

    let trend = Trend::classify(first.average_sediment_size_mm, last.average_sediment_size_mm);
    let label = match trend {
        Trend::Decreasing => format!(
            "Downstream fining: average grain size falls from {:.1} mm at site {} to {:.1} mm at site {}",
            first.average_sediment_size_mm,
            first.site_number,
            last.average_sediment_size_mm,
            last.site_number
        ),
        Trend::Increasing => format!(
            "Downstream coarsening: average grain size rises from {:.1} mm at site {} to {:.1} mm at site {}",
            first.average_sediment_size_mm,
            first.site_number,
            last.average_sediment_size_mm,
            last.site_number
        ),
        Trend::Stable => "Average grain size is broadly stable downstream".to_string(),
        Trend::InsufficientData => {
            "Not enough sediment data to classify a downstream trend".to_string()
        }
    };
    (trend, label)
}

/// Best-effort downstream velocity trend over sites with completed runs.
fn velocity_trend(metrics: &[SiteMetrics]) -> (Trend, String) {
    let with_data: Vec<_> = metrics
        .iter()
        .filter(|m| m.average_velocity_ms > 0.0)
        .collect();

    let (Some(first), Some(last)) = (with_data.first(), with_data.last()) else {
        return (
            Trend::InsufficientData,
            "Not enough velocity data to classify a downstream trend".to_string(),
        );
    };
    if first.site_number == last.site_number {
        return (
            Trend::InsufficientData,
            "Not enough velocity data to classify a downstream trend".to_string(),
        );
    }

    let trend = Trend::classify(first.average_velocity_ms, last.average_velocity_ms);
    let label = match trend {
        Trend::Increasing => format!(
            "Velocity increases downstream: {:.2} m/s at site {} to {:.2} m/s at site {}",
            first.average_velocity_ms,
            first.site_number,
            last.average_velocity_ms,
            last.site_number
        ),
        Trend::Decreasing => format!(
            "Velocity decreases downstream: {:.2} m/s at site {} to {:.2} m/s at site {}",
            first.average_velocity_ms,
            first.site_number,
            last.average_velocity_ms,
            last.site_number
        ),
        Trend::Stable => "Average velocity is broadly stable downstream".to_string(),
        Trend::InsufficientData => {
            "Not enough velocity data to classify a downstream trend".to_string()
        }
    };
    (trend, label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurements::{
        MeasurementPoint, Roundness, SedimentMeasurement, VelocityMeasurement,
    };

    fn site_with(
        number: u32,
        depths: &[(f64, f64)],
        runs: &[(f64, f64)],
        grains: &[(f64, u8)],
    ) -> Site {
        let mut site = Site::new(number, 4.0).unwrap();
        site.measurement_points = depths
            .iter()
            .enumerate()
            .map(|(i, (distance, depth))| MeasurementPoint {
                point_number: (i + 1) as u32,
                distance_from_bank_m: *distance,
                depth_m: *depth,
            })
            .collect();
        site.velocity_measurements = runs
            .iter()
            .map(|(time, distance)| VelocityMeasurement {
                time_s: *time,
                distance_m: *distance,
            })
            .collect();
        site.sediment_measurements = grains
            .iter()
            .map(|(size, class)| SedimentMeasurement {
                size_mm: *size,
                roundness: Roundness::try_from(*class).unwrap(),
            })
            .collect();
        site
    }

    #[test]
    fn test_empty_study_summary() {
        let summary = compute_study_summary(&[]);
        assert_eq!(summary.total_sites, 0);
        assert_eq!(summary.total_area_m2, 0.0);
        assert_eq!(summary.average_velocity_ms, 0.0);
        assert_eq!(summary.total_discharge_m3s, 0.0);
        assert_eq!(summary.average_sediment_size_mm, 0.0);
        assert_eq!(summary.sediment_trend, Trend::InsufficientData);
        assert_eq!(summary.velocity_trend, Trend::InsufficientData);
    }

    #[test]
    fn test_totals_sum_across_sites() {
        // Each site: area 2 m², avg velocity 1 m/s, discharge 2 m³/s.
        let profile = [(0.0, 0.0), (2.0, 1.0), (4.0, 0.0)];
        let sites = vec![
            site_with(1, &profile, &[(10.0, 10.0)], &[]),
            site_with(2, &profile, &[(10.0, 10.0)], &[]),
        ];

        let summary = compute_study_summary(&sites);
        assert_eq!(summary.total_sites, 2);
        assert_eq!(summary.total_area_m2, 4.0);
        assert_eq!(summary.total_discharge_m3s, 4.0);
    }

    #[test]
    fn test_velocity_is_mean_of_site_means() {
        // Site 1: two runs averaging 1.0; site 2: one run at 3.0.
        // Mean of means = 2.0, not the pooled (1.0+1.0+3.0)/3.
        let sites = vec![
            site_with(1, &[], &[(10.0, 10.0), (10.0, 10.0)], &[]),
            site_with(2, &[], &[(10.0, 30.0)], &[]),
        ];
        let summary = compute_study_summary(&sites);
        assert_eq!(summary.average_velocity_ms, 2.0);
    }

    #[test]
    fn test_sediment_is_pooled_mean() {
        // Site 1: one sample of 10 mm; site 2: three samples of 30 mm.
        // Pooled mean = 100/4 = 25, not the mean-of-means 20.
        let sites = vec![
            site_with(1, &[], &[], &[(10.0, 3)]),
            site_with(2, &[], &[], &[(30.0, 3), (30.0, 4), (30.0, 5)]),
        ];
        let summary = compute_study_summary(&sites);
        assert_eq!(summary.average_sediment_size_mm, 25.0);
    }

    #[test]
    fn test_downstream_fining_detected() {
        let sites = vec![
            site_with(1, &[], &[], &[(40.0, 1)]),
            site_with(2, &[], &[], &[(25.0, 3)]),
            site_with(3, &[], &[], &[(8.0, 5)]),
        ];
        let summary = compute_study_summary(&sites);
        assert_eq!(summary.sediment_trend, Trend::Decreasing);
        assert!(summary.sediment_trend_label.contains("fining"));
    }

    #[test]
    fn test_velocity_increase_detected() {
        let sites = vec![
            site_with(1, &[], &[(20.0, 10.0)], &[]),
            site_with(2, &[], &[(10.0, 10.0)], &[]),
        ];
        let summary = compute_study_summary(&sites);
        assert_eq!(summary.velocity_trend, Trend::Increasing);
    }

    #[test]
    fn test_single_site_trend_is_insufficient() {
        let sites = vec![site_with(1, &[], &[(10.0, 10.0)], &[(10.0, 3)])];
        let summary = compute_study_summary(&sites);
        assert_eq!(summary.sediment_trend, Trend::InsufficientData);
        assert_eq!(summary.velocity_trend, Trend::InsufficientData);
    }

    #[test]
    fn test_summary_is_deterministic() {
        let sites = vec![
            site_with(1, &[(0.0, 0.0), (2.0, 1.0)], &[(10.0, 10.0)], &[(10.0, 3)]),
            site_with(2, &[(0.0, 0.0), (3.0, 0.5)], &[(5.0, 10.0)], &[(5.0, 5)]),
        ];
        let a = serde_json::to_string(&compute_study_summary(&sites)).unwrap();
        let b = serde_json::to_string(&compute_study_summary(&sites)).unwrap();
        assert_eq!(a, b);
    }
}
