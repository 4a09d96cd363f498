//! # PDF Generation Module
//!
//! Renders a composed [`ReportDocument`] to PDF using Typst.
//!
//! ## Architecture
//!
//! - The Typst source is built block by block from the document
//! - Pagination contracts are mapped onto Typst primitives:
//!   `force_page_break_before` → `#pagebreak()`, atomic blocks →
//!   `#block(breakable: false)`, splittable tables → `table.header(..)`
//!   (which Typst repeats on continuation pages; rows never split)
//! - The cross-section chart is drawn from the declarative [`ChartSpec`]
//!   series, scaled to the page in this module only
//! - Output is raw PDF bytes (`Vec<u8>`)
//!
//! ## Example
//!
//! ```rust,no_run
//! use hydro_core::pdf::render_study_pdf;
//! use hydro_core::study::Study;
//! use hydro_core::site::Site;
//!
//! let mut study = Study::new("Fieldwork 2026", "River Lyn", "Exmoor");
//! study.add_site(Site::new(1, 3.2).unwrap()).unwrap();
//!
//! let pdf_bytes = render_study_pdf(&study).unwrap();
//! std::fs::write("fieldwork_report.pdf", pdf_bytes).unwrap();
//! ```

use chrono::Utc;
use once_cell::sync::Lazy;
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;

use crate::errors::{HydroError, HydroResult};
use crate::measurements::Roundness;
use crate::report::{
    compose_report, Block, BlockContent, ChartSpec, Fragmentation, OverviewTable, ReportDocument,
    SiteSection, SummaryBlock,
};
use crate::study::Study;

// ============================================================================
// Typst World Implementation
// ============================================================================

/// Bundled fonts, loaded once per process.
static FONTS: Lazy<Vec<Font>> = Lazy::new(|| {
    let mut fonts = Vec::new();
    for font_bytes in typst_assets::fonts() {
        let buffer = Bytes::new(font_bytes.to_vec());
        for font in Font::iter(buffer) {
            fonts.push(font);
        }
    }
    fonts
});

/// A minimal Typst world for compiling documents without external files.
struct PdfWorld {
    /// The main source document
    main: Source,
    /// Font book
    book: LazyHash<FontBook>,
    /// Available fonts
    fonts: Vec<Font>,
    /// Library (standard functions)
    library: LazyHash<Library>,
}

impl PdfWorld {
    fn new(source: String) -> Self {
        let fonts = FONTS.clone();
        let book = FontBook::from_fonts(&fonts);

        PdfWorld {
            main: Source::detached(source),
            book: LazyHash::new(book),
            fonts,
            library: LazyHash::new(Library::default()),
        }
    }
}

impl World for PdfWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &self.book
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        self.fonts.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        let now = Utc::now();
        Datetime::from_ymd(
            now.format("%Y").to_string().parse().ok()?,
            now.format("%m").to_string().parse().ok()?,
            now.format("%d").to_string().parse().ok()?,
        )
    }
}

// ============================================================================
// Chart Layout
// ============================================================================

/// Drawable width of the cross-section chart on the page (pt).
const CHART_WIDTH_PT: f64 = 420.0;

/// Maximum drawable height of the chart below the water line (pt).
const CHART_HEIGHT_PT: f64 = 120.0;

// ============================================================================
// PDF Rendering Functions
// ============================================================================

/// Compose and render a study report in one step.
pub fn render_study_pdf(study: &Study) -> HydroResult<Vec<u8>> {
    let report = compose_report(study)?;
    render_report_pdf(&report)
}

/// Render a composed report to PDF.
///
/// # Returns
///
/// * `Ok(Vec<u8>)` - PDF file as bytes
/// * `Err(HydroError)` - If Typst compilation or PDF export fails
pub fn render_report_pdf(report: &ReportDocument) -> HydroResult<Vec<u8>> {
    let source = build_typst_source(report);

    let world = PdfWorld::new(source);
    let warned = typst::compile(&world);

    let document = warned.output.map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        HydroError::report_failed(
            "typst compilation",
            format!("Typst compilation failed: {}", error_msgs.join("; ")),
        )
    })?;

    let pdf_bytes = typst_pdf::pdf(&document, &PdfOptions::default()).map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        HydroError::report_failed(
            "pdf export",
            format!("PDF rendering failed: {}", error_msgs.join("; ")),
        )
    })?;

    Ok(pdf_bytes)
}

/// Build the full Typst source for a report.
fn build_typst_source(report: &ReportDocument) -> String {
    let mut source = format!(
        r##"
#set page(
  paper: "a4",
  margin: (top: 2cm, bottom: 2cm, left: 2cm, right: 2cm),
  header: align(right)[
    #text(size: 9pt, fill: gray)[RiverLog Field Study Suite]
  ],
  footer: context [
    #line(length: 100%, stroke: 0.5pt + gray)
    #v(4pt)
    #grid(
      columns: (1fr, 1fr, 1fr),
      align(left)[#text(size: 9pt)[{title}]],
      align(center)[#text(size: 9pt)[Page #counter(page).display()]],
      align(right)[#text(size: 9pt)[{date}]],
    )
  ]
)

#set text(size: 10.5pt)
"##,
        title = escape_typst(&report.title),
        date = Utc::now().format("%Y-%m-%d"),
    );

    for block in &report.blocks {
        if block.break_policy.force_page_break_before {
            source.push_str("\n#pagebreak()\n");
        }
        source.push_str(&render_block(block));
    }

    source.push_str(
        "\n#v(24pt)\n#text(size: 9pt, fill: gray)[\n  Generated by RiverLog Field Study Suite\n]\n",
    );

    source
}

/// Render one block, wrapping atomic content so Typst keeps it whole.
fn render_block(block: &Block) -> String {
    let body = match &block.content {
        BlockContent::Summary(summary) => render_summary(summary),
        BlockContent::SiteOverviewTable(table) => render_overview_table(table),
        BlockContent::SiteSection(section) => render_site_section(section),
    };

    match block.break_policy.fragmentation {
        Fragmentation::Atomic => format!("\n#block(breakable: false)[\n{}\n]\n", body),
        // Splittable tables flow naturally; table.header handles repeats.
        Fragmentation::SplitWithHeaderRepeat => format!("\n{}\n", body),
    }
}

fn render_summary(summary: &SummaryBlock) -> String {
    let s = &summary.summary;
    format!(
        r##"
#align(center)[
  #block(width: 100%, fill: rgb("#eef4f8"), inset: 12pt, radius: 4pt)[
    #text(size: 18pt, weight: "bold")[River Study Report]
    #v(4pt)
    #text(size: 14pt)[{name}]
  ]
]

#v(12pt)

#grid(
  columns: (1fr, 1fr),
  gutter: 20pt,
  [
    *Study Information*
    #v(4pt)
    #table(
      columns: (auto, 1fr),
      stroke: none,
      row-gutter: 4pt,
      [River:], [{river}],
      [Location:], [{location}],
      [Study date:], [{study_date}],
      [Sites:], [{total_sites}],
    )
  ],
  [
    *Key Results*
    #v(4pt)
    #table(
      columns: (auto, 1fr),
      stroke: none,
      row-gutter: 4pt,
      [Total area:], [{total_area} m#super[2]],
      [Mean velocity:], [{avg_velocity} m/s],
      [Total discharge:], [{total_discharge} m#super[3]/s],
      [Mean grain size:], [{avg_sediment} mm],
    )
  ]
)

#v(8pt)

*Downstream Trends*
#v(4pt)
- {sediment_trend}
- {velocity_trend}
"##,
        name = escape_typst(&summary.study_name),
        river = escape_typst(&summary.river),
        location = escape_typst(&summary.location),
        study_date = escape_typst(&summary.study_date),
        total_sites = s.total_sites,
        total_area = format!("{:.2}", s.total_area_m2),
        avg_velocity = format!("{:.2}", s.average_velocity_ms),
        total_discharge = format!("{:.2}", s.total_discharge_m3s),
        avg_sediment = format!("{:.1}", s.average_sediment_size_mm),
        sediment_trend = escape_typst(&s.sediment_trend_label),
        velocity_trend = escape_typst(&s.velocity_trend_label),
    )
}

fn render_overview_table(table: &OverviewTable) -> String {
    let rows: String = table
        .rows
        .iter()
        .map(|row| {
            format!(
                "  [{}], [{:.2}], [{:.2}], [{:.2}], [{:.2}], [{:.1}],",
                row.site_number,
                row.river_width_m,
                row.cross_sectional_area_m2,
                row.average_velocity_ms,
                row.discharge_m3s,
                row.average_sediment_size_mm,
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r##"
#v(12pt)
== Site Overview

#table(
  columns: (auto, auto, auto, auto, auto, auto),
  inset: 8pt,
  stroke: 0.5pt,
  align: (center, right, right, right, right, right),
  table.header([*Site*], [*Width (m)*], [*Area (m#super[2])*], [*Velocity (m/s)*], [*Discharge (m#super[3]/s)*], [*Sediment (mm)*]),
{rows}
)
"##,
    )
}

fn render_site_section(section: &SiteSection) -> String {
    let m = &section.metrics;
    let point_rows: String = section
        .measurement_points
        .iter()
        .map(|p| {
            format!(
                "  [{}], [{:.2}], [{:.2}],",
                p.point_number, p.distance_from_bank_m, p.depth_m
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let distribution_rows: String = Roundness::all()
        .iter()
        .map(|class| {
            format!(
                "  [{} ({})], [{}],",
                class.class(),
                class.label(),
                m.sediment_distribution[(class.class() - 1) as usize]
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r##"
#v(12pt)
== Site {site_number}

#table(
  columns: (1fr, auto, auto),
  inset: 8pt,
  stroke: 0.5pt,
  align: (left, right, left),
  table.header([*Metric*], [*Value*], [*Unit*]),
  [River width], [{width}], [m],
  [Cross-sectional area], [{area}], [m#super[2]],
  [Average depth], [{avg_depth}], [m],
  [Maximum depth], [{max_depth}], [m],
  [Wetted perimeter], [{perimeter}], [m],
  [Average velocity], [{velocity}], [m/s],
  [Discharge], [{discharge}], [m#super[3]/s],
  [Average grain size], [{sediment}], [mm],
)

#v(12pt)
=== Cross-Section Profile

{chart}

#v(12pt)
#grid(
  columns: (1fr, 1fr),
  gutter: 20pt,
  [
    === Measurement Points
    #table(
      columns: (auto, auto, auto),
      inset: 6pt,
      stroke: 0.5pt,
      align: (center, right, right),
      table.header([*Point*], [*Distance (m)*], [*Depth (m)*]),
{point_rows}
    )
  ],
  [
    === Sediment Roundness
    #table(
      columns: (1fr, auto),
      inset: 6pt,
      stroke: 0.5pt,
      align: (left, right),
      table.header([*Powers class*], [*Count*]),
{distribution_rows}
    )
  ]
)
"##,
        site_number = section.site_number,
        width = format!("{:.2}", section.river_width_m),
        area = format!("{:.2}", m.cross_sectional_area_m2),
        avg_depth = format!("{:.2}", m.average_depth_m),
        max_depth = format!("{:.2}", m.max_depth_m),
        perimeter = format!("{:.2}", m.wetted_perimeter_m),
        velocity = format!("{:.2}", m.average_velocity_ms),
        discharge = format!("{:.2}", m.discharge_m3s),
        sediment = format!("{:.1}", m.average_sediment_size_mm),
        chart = render_chart(&section.chart),
    )
}

/// Draw the declarative chart series as a Typst polygon plus lines.
///
/// Page coordinates: x grows right, y grows down, water surface at y = 0
/// of the chart box. Chart y = `-series_y × scale` so deeper bed points
/// plot lower on the page.
fn render_chart(chart: &ChartSpec) -> String {
    if chart.bed_line.is_empty() {
        return "#text(size: 9pt, fill: gray)[No depth profile recorded yet.]".to_string();
    }

    let x_scale = CHART_WIDTH_PT / chart.annotated_width_m.max(f64::MIN_POSITIVE);
    let y_scale = CHART_HEIGHT_PT / (-chart.floor_y_m).max(f64::MIN_POSITIVE);

    let fill_points: String = chart
        .fill_region
        .iter()
        .map(|p| {
            format!(
                "({:.1}pt, {:.1}pt)",
                p.x_m * x_scale,
                -p.y_m * y_scale
            )
        })
        .collect::<Vec<_>>()
        .join(", ");

    let surface_y = 0.0;
    let box_height = CHART_HEIGHT_PT + 30.0;

    format!(
        r##"#box(width: {chart_width}pt, height: {box_height}pt)[
  #place(top + left, dy: 4pt)[
    #polygon(fill: rgb("#c9a36b"), stroke: 0.8pt + rgb("#6b4f2a"), {fill_points})
  ]
  #place(top + left, dy: 4pt)[
    #line(start: (0pt, {surface_y}pt), end: ({chart_width}pt, {surface_y}pt), stroke: 1.2pt + rgb("#2c7fb8"))
  ]
  #place(bottom + center)[
    #text(size: 9pt)[Channel width: {width} m]
  ]
]"##,
        chart_width = format!("{:.1}", CHART_WIDTH_PT),
        box_height = format!("{:.1}", box_height),
        fill_points = fill_points,
        surface_y = format!("{:.1}", surface_y),
        width = format!("{:.2}", chart.annotated_width_m),
    )
}

/// Escape special Typst characters in user-provided text
fn escape_typst(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '*' => "\\*".to_string(),
            '_' => "\\_".to_string(),
            '#' => "\\#".to_string(),
            '$' => "\\$".to_string(),
            '@' => "\\@".to_string(),
            '<' => "\\<".to_string(),
            '>' => "\\>".to_string(),
            '\\' => "\\\\".to_string(),
            '`' => "\\`".to_string(),
            _ => c.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurements::{MeasurementPoint, Roundness, SedimentMeasurement, VelocityMeasurement};
    use crate::site::Site;

    fn demo_study() -> Study {
        let mut study = Study::new("PDF Test Study", "River Lyn", "Exmoor");
        let mut site = Site::new(1, 4.0).unwrap();
        site.measurement_points = vec![
            MeasurementPoint {
                point_number: 1,
                distance_from_bank_m: 0.0,
                depth_m: 0.0,
            },
            MeasurementPoint {
                point_number: 2,
                distance_from_bank_m: 2.0,
                depth_m: 1.0,
            },
            MeasurementPoint {
                point_number: 3,
                distance_from_bank_m: 4.0,
                depth_m: 0.0,
            },
        ];
        site.velocity_measurements = vec![VelocityMeasurement {
            time_s: 10.0,
            distance_m: 10.0,
        }];
        site.sediment_measurements = vec![SedimentMeasurement {
            size_mm: 22.0,
            roundness: Roundness::SubRounded,
        }];
        study.add_site(site).unwrap();
        study.add_site(Site::new(2, 5.0).unwrap()).unwrap();
        study
    }

    #[test]
    fn test_source_honors_pagination_contract() {
        let report = compose_report(&demo_study()).unwrap();
        let source = build_typst_source(&report);

        // One forced break: the second site section.
        assert_eq!(source.matches("#pagebreak()").count(), 1);
        // Atomic blocks are wrapped unbreakable.
        assert!(source.contains("#block(breakable: false)"));
        // The overview table header repeats on splits.
        assert!(source.contains("table.header([*Site*]"));
    }

    #[test]
    fn test_source_escapes_user_text() {
        let mut study = demo_study();
        study.meta.name = "Year 10 *fieldwork* #3".to_string();
        let report = compose_report(&study).unwrap();
        let source = build_typst_source(&report);
        assert!(source.contains("Year 10 \\*fieldwork\\* \\#3"));
    }

    #[test]
    fn test_empty_profile_chart_placeholder() {
        let site = Site::new(9, 3.0).unwrap();
        let spec = ChartSpec::cross_section(&site);
        assert!(render_chart(&spec).contains("No depth profile"));
    }

    #[test]
    fn test_pdf_generation() {
        let pdf = render_study_pdf(&demo_study());
        assert!(pdf.is_ok(), "PDF generation failed: {:?}", pdf.err());

        let pdf_bytes = pdf.unwrap();
        // PDF should start with %PDF
        assert!(pdf_bytes.starts_with(b"%PDF"), "Output is not a valid PDF");
        // Should be a reasonable size (at least 1KB)
        assert!(pdf_bytes.len() > 1000, "PDF seems too small");
    }
}
