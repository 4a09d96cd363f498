//! # Report Composer
//!
//! Lays out computed metrics and chart specifications into an ordered,
//! paginated document structure. The composer never renders anything; it
//! produces a [`ReportDocument`] whose blocks carry an explicit
//! pagination contract that any renderer must honor:
//!
//! - an atomic block must not straddle a page boundary
//! - a splittable table may break, but its header row repeats on the
//!   continuation page and no single row is ever split
//! - a block flagged `force_page_break_before` starts a new page
//!
//! Composition is total for incomplete data; the only rejection is a
//! study that fails boundary validation.
//!
//! ## Example
//!
//! ```rust
//! use hydro_core::report::compose_report;
//! use hydro_core::study::Study;
//! use hydro_core::site::Site;
//!
//! let mut study = Study::new("Demo", "River Lyn", "Exmoor");
//! study.add_site(Site::new(1, 3.0).unwrap()).unwrap();
//! study.add_site(Site::new(2, 4.0).unwrap()).unwrap();
//!
//! let report = compose_report(&study).unwrap();
//! // 1 Summary + 1 SiteOverviewTable + N SiteSections
//! assert_eq!(report.blocks.len(), 4);
//! ```

pub mod chart;

use serde::{Deserialize, Serialize};

use crate::calculations::{compute_site_metrics, compute_study_summary, SiteMetrics, StudySummary};
use crate::errors::HydroResult;
use crate::measurements::MeasurementPoint;
use crate::study::Study;

pub use chart::{ChartPoint, ChartSpec};

/// How a block may interact with page boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fragmentation {
    /// Must be kept whole on one page
    Atomic,
    /// May break across pages; header row repeats, rows stay whole
    SplitWithHeaderRepeat,
}

/// Pagination contract for one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakPolicy {
    /// Renderer must start a new page before this block
    pub force_page_break_before: bool,

    /// Whether the block may split across pages
    pub fragmentation: Fragmentation,
}

impl BreakPolicy {
    fn atomic() -> Self {
        BreakPolicy {
            force_page_break_before: false,
            fragmentation: Fragmentation::Atomic,
        }
    }

    fn splittable_table() -> Self {
        BreakPolicy {
            force_page_break_before: false,
            fragmentation: Fragmentation::SplitWithHeaderRepeat,
        }
    }
}

/// Study-level KPI block: metadata plus the study-wide summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryBlock {
    pub study_name: String,
    pub river: String,
    pub location: String,
    pub study_date: String,
    pub summary: StudySummary,
}

/// One row of the site overview table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewRow {
    pub site_number: u32,
    pub river_width_m: f64,
    pub cross_sectional_area_m2: f64,
    pub average_velocity_ms: f64,
    pub discharge_m3s: f64,
    pub average_sediment_size_mm: f64,
}

/// The all-sites comparison table, one row per site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewTable {
    pub rows: Vec<OverviewRow>,
}

/// Per-site detail: metrics, the cross-section chart, and the raw
/// measurement-point table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteSection {
    pub site_number: u32,
    pub river_width_m: f64,
    pub metrics: SiteMetrics,
    pub chart: ChartSpec,
    pub measurement_points: Vec<MeasurementPoint>,
}

/// Block payloads, in document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BlockContent {
    Summary(SummaryBlock),
    SiteOverviewTable(OverviewTable),
    SiteSection(SiteSection),
}

impl BlockContent {
    /// Block kind as a string, for renderers and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            BlockContent::Summary(_) => "Summary",
            BlockContent::SiteOverviewTable(_) => "SiteOverviewTable",
            BlockContent::SiteSection(_) => "SiteSection",
        }
    }
}

/// One unit of report content with its pagination contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub break_policy: BreakPolicy,
    pub content: BlockContent,
}

/// The composed, renderer-agnostic report.
///
/// Identical input studies produce byte-for-byte identical documents
/// (the composer is a pure function and serialization order is fixed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDocument {
    pub title: String,
    pub blocks: Vec<Block>,
}

/// Compose the full report for a study.
///
/// Produces, in order: one `Summary` block, one `SiteOverviewTable`
/// block, then one `SiteSection` per site. Every site section after the
/// first requests a forced page break so each site starts on a fresh
/// page. Tables are splittable with header repeat; everything else is
/// atomic.
///
/// Fails only if the study itself is malformed; incomplete measurement
/// data composes to zero/empty defaults.
pub fn compose_report(study: &Study) -> HydroResult<ReportDocument> {
    study.validate()?;

    let summary = compute_study_summary(&study.sites);
    let site_metrics: Vec<SiteMetrics> = study.sites.iter().map(compute_site_metrics).collect();

    let mut blocks = Vec::with_capacity(2 + study.sites.len());

    blocks.push(Block {
        break_policy: BreakPolicy::atomic(),
        content: BlockContent::Summary(SummaryBlock {
            study_name: study.meta.name.clone(),
            river: study.meta.river.clone(),
            location: study.meta.location.clone(),
            study_date: study.meta.study_date.to_string(),
            summary,
        }),
    });

    blocks.push(Block {
        break_policy: BreakPolicy::splittable_table(),
        content: BlockContent::SiteOverviewTable(OverviewTable {
            rows: study
                .sites
                .iter()
                .zip(&site_metrics)
                .map(|(site, metrics)| OverviewRow {
                    site_number: site.site_number,
                    river_width_m: site.river_width_m,
                    cross_sectional_area_m2: metrics.cross_sectional_area_m2,
                    average_velocity_ms: metrics.average_velocity_ms,
                    discharge_m3s: metrics.discharge_m3s,
                    average_sediment_size_mm: metrics.average_sediment_size_mm,
                })
                .collect(),
        }),
    });

    for (index, (site, metrics)) in study.sites.iter().zip(site_metrics).enumerate() {
        blocks.push(Block {
            break_policy: BreakPolicy {
                // The first site section flows after the overview table;
                // every later one starts its own page.
                force_page_break_before: index > 0,
                fragmentation: Fragmentation::Atomic,
            },
            content: BlockContent::SiteSection(SiteSection {
                site_number: site.site_number,
                river_width_m: site.river_width_m,
                metrics,
                chart: ChartSpec::cross_section(site),
                measurement_points: site.measurement_points.clone(),
            }),
        });
    }

    Ok(ReportDocument {
        title: format!("{} - River Study Report", study.meta.name),
        blocks,
    })
}
