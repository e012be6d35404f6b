//! Summary rendering for simulation runs
//!
//! This crate turns a [`RunReport`] into:
//!
//! - A human-readable text summary
//! - A JSON document

#![warn(missing_docs)]
#![warn(clippy::all)]

use jobsim_core::RunReport;

const HEADER: &str = "=== Simulation Summary ===";
const FOOTER: &str = "==========================";

/// Render the end-of-run summary
///
/// Failure details list one line per error code in ascending code order and
/// are omitted when every job succeeded.
pub fn render_text(report: &RunReport) -> String {
    let failures = report.total_failures();
    let mut lines = vec![
        HEADER.to_string(),
        format!("Total jobs: {}", report.num_jobs),
        format!("Successful jobs: {}", report.total_success()),
        format!("Failed jobs: {failures}"),
    ];

    if failures > 0 {
        lines.push("Failure details:".to_string());
        lines.extend(
            report
                .stats
                .failures
                .iter()
                .map(|(code, count)| format!("  Error code {code}: {count}")),
        );
    }

    let totals = report.pool_totals();
    lines.push(format!(
        "Workers: {} (utilization {:.1}%)",
        report.num_workers,
        totals.utilization(report.elapsed) * 100.0
    ));
    lines.push(format!("Simulated time: {:.2} units", report.elapsed));
    if let Some(model) = &report.error_model {
        lines.push(format!("Error model: {model}"));
    }
    lines.push(FOOTER.to_string());

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Render the full report as pretty-printed JSON
pub fn render_json(report: &RunReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}
