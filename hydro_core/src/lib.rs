//! # hydro_core - River Study Calculation Engine
//!
//! `hydro_core` is the computational heart of RiverLog. It turns raw
//! field measurements from river-study sites (depth profiles, float
//! timings, sediment samples) into standard hydrology metrics and a
//! paginated multi-site report.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: derived metrics are pure functions over immutable
//!   input snapshots; recompute-on-change is just calling again
//! - **Total over partial input**: sites fill in incrementally in the
//!   field, so every aggregation has a documented zero/empty default
//! - **JSON-First**: all inputs and outputs implement Serialize/Deserialize
//! - **Rich Errors**: structured error types, not just strings
//!
//! ## Quick Start
//!
//! ```rust
//! use hydro_core::study::Study;
//! use hydro_core::site::Site;
//! use hydro_core::calculations::compute_study_summary;
//!
//! let mut study = Study::new("Fieldwork 2026", "River Lyn", "Exmoor");
//! study.add_site(Site::new(1, 3.2).unwrap()).unwrap();
//!
//! let summary = compute_study_summary(&study.sites);
//! assert_eq!(summary.total_sites, 1);
//! ```
//!
//! ## Modules
//!
//! - [`study`] - Study container and metadata
//! - [`site`] - Per-site measurement collections
//! - [`measurements`] - Raw field measurement records
//! - [`calculations`] - Geometry, flow, sediment, and aggregation
//! - [`report`] - Paginated report composition (renderer-agnostic)
//! - [`pdf`] - Typst-based PDF rendering of composed reports
//! - [`errors`] - Structured error types
//! - [`file_io`] - File operations with atomic saves and locking

pub mod calculations;
pub mod errors;
pub mod file_io;
pub mod measurements;
pub mod pdf;
pub mod report;
pub mod site;
pub mod study;

// Re-export commonly used types at crate root for convenience
pub use calculations::{compute_site_metrics, compute_study_summary, SiteMetrics, StudySummary};
pub use errors::{HydroError, HydroResult};
pub use file_io::{load_study, save_study, FileLock};
pub use report::{compose_report, ReportDocument};
pub use site::Site;
pub use study::{Study, StudyMetadata};
