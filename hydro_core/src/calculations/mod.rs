//! # Hydrology Calculations
//!
//! This module contains the derived-metric calculators. Each calculator
//! follows the pattern:
//!
//! - Pure functions over validated measurement slices
//! - Total over partial input: empty collections yield documented
//!   zero/empty defaults, never errors (sites are populated incrementally
//!   in the field)
//! - JSON-serializable result structs
//!
//! ## Available Calculations
//!
//! - [`geometry`] - Cross-sectional area, depths, wetted perimeter
//! - [`flow`] - Velocity statistics and discharge
//! - [`sediment`] - Roundness distribution and grain-size average
//! - [`site_metrics`] - Per-site composition of the three above
//! - [`summary`] - Study-wide totals, averages, and trend labels

pub mod flow;
pub mod geometry;
pub mod sediment;
pub mod site_metrics;
pub mod summary;

// Re-export commonly used types
pub use site_metrics::{compute_site_metrics, SiteMetrics};
pub use summary::{compute_study_summary, StudySummary, Trend};
