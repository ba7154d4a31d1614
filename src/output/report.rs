//! Harvest run summary

use crate::harvester::HarvestReport;

/// Prints the summary of a finished harvest to stdout
pub fn print_report(report: &HarvestReport) {
    println!("=== Harvest Summary ===\n");

    println!("Query: {}", report.query_text);
    println!("  Pages fetched: {}", report.pages_fetched);
    println!("  Stopped on: {}", report.termination);
    println!("  Vacancies stored: {}", report.record_count);
    println!(
        "  Started: {}",
        report.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("  Duration: {}s", report.duration_seconds());
}
