//! # RiverLog CLI Application
//!
//! Terminal front-end for the river study engine: load a `.rsf` study
//! file (or run a built-in demo), print computed metrics, and export the
//! PDF report.
//!
//! ## Usage
//!
//! ```text
//! hydro_cli                    # interactive demo study
//! hydro_cli study.rsf          # print metrics for a saved study
//! hydro_cli study.rsf out.pdf  # also export the PDF report
//! ```

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::ExitCode;

use hydro_core::calculations::{compute_site_metrics, compute_study_summary};
use hydro_core::file_io::load_study;
use hydro_core::measurements::{MeasurementPoint, VelocityMeasurement};
use hydro_core::pdf::render_study_pdf;
use hydro_core::site::Site;
use hydro_core::study::Study;

fn prompt_f64(prompt: &str, default: f64) -> f64 {
    print!("{}", prompt);
    if io::stdout().flush().is_err() {
        return default;
    }

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return default;
    }

    input.trim().parse().unwrap_or(default)
}

fn main() -> ExitCode {
    println!("RiverLog CLI - River Study Calculator");
    println!("=====================================");
    println!();

    let args: Vec<String> = std::env::args().skip(1).collect();

    let study = match args.first() {
        Some(path) => match load_study(Path::new(path)) {
            Ok(study) => study,
            Err(e) => {
                eprintln!("Error loading '{}': {}", path, e);
                if let Ok(json) = serde_json::to_string_pretty(&e) {
                    eprintln!();
                    eprintln!("Error JSON:");
                    eprintln!("{}", json);
                }
                return ExitCode::FAILURE;
            }
        },
        None => demo_study(),
    };

    print_study(&study);

    if let Some(pdf_path) = args.get(1) {
        match render_study_pdf(&study) {
            Ok(bytes) => {
                if let Err(e) = std::fs::write(pdf_path, bytes) {
                    eprintln!("Error writing '{}': {}", pdf_path, e);
                    return ExitCode::FAILURE;
                }
                println!();
                println!("Report written to {}", pdf_path);
            }
            Err(e) => {
                eprintln!("Error rendering report: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}

/// Build a single-site demo study from interactive input.
fn demo_study() -> Study {
    println!("No study file given. Running single-site demo...");
    println!();

    let width = prompt_f64("Enter river width (m) [4.0]: ", 4.0);
    let mid_depth = prompt_f64("Enter mid-channel depth (m) [1.0]: ", 1.0);
    let float_time = prompt_f64("Enter 10 m float time (s) [10.0]: ", 10.0);
    println!();

    let mut study = Study::new("CLI Demo Study", "Demo River", "Demo Location");
    let mut site = Site::new(1, width).expect("demo width is positive");
    site.measurement_points = vec![
        MeasurementPoint {
            point_number: 1,
            distance_from_bank_m: 0.0,
            depth_m: 0.0,
        },
        MeasurementPoint {
            point_number: 2,
            distance_from_bank_m: width / 2.0,
            depth_m: mid_depth,
        },
        MeasurementPoint {
            point_number: 3,
            distance_from_bank_m: width,
            depth_m: 0.0,
        },
    ];
    site.velocity_measurements = vec![VelocityMeasurement {
        time_s: float_time,
        distance_m: 10.0,
    }];
    study.add_site(site).expect("demo site is valid");
    study
}

fn print_study(study: &Study) {
    println!("═══════════════════════════════════════");
    println!("  {}", study.meta.name);
    println!("  {} at {}", study.meta.river, study.meta.location);
    println!("═══════════════════════════════════════");

    for site in &study.sites {
        let metrics = compute_site_metrics(site);
        println!();
        println!("Site {}:", site.site_number);
        println!("  Width:            {:.2} m", site.river_width_m);
        println!("  Area:             {:.2} m²", metrics.cross_sectional_area_m2);
        println!("  Average depth:    {:.2} m", metrics.average_depth_m);
        println!("  Max depth:        {:.2} m", metrics.max_depth_m);
        println!("  Wetted perimeter: {:.2} m", metrics.wetted_perimeter_m);
        println!("  Average velocity: {:.2} m/s", metrics.average_velocity_ms);
        println!("  Discharge:        {:.2} m³/s", metrics.discharge_m3s);
        println!("  Sediment size:    {:.1} mm", metrics.average_sediment_size_mm);
    }

    let summary = compute_study_summary(&study.sites);
    println!();
    println!("═══════════════════════════════════════");
    println!("  STUDY SUMMARY");
    println!("═══════════════════════════════════════");
    println!("  Sites:            {}", summary.total_sites);
    println!("  Total area:       {:.2} m²", summary.total_area_m2);
    println!("  Mean velocity:    {:.2} m/s", summary.average_velocity_ms);
    println!("  Total discharge:  {:.2} m³/s", summary.total_discharge_m3s);
    println!("  Mean grain size:  {:.1} mm", summary.average_sediment_size_mm);
    println!("  {}", summary.sediment_trend_label);
    println!("  {}", summary.velocity_trend_label);

    println!();
    println!("JSON Output (for API use):");
    if let Ok(json) = serde_json::to_string_pretty(&summary) {
        println!("{}", json);
    }
}
