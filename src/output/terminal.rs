//! Console summary output.

use crate::models::AuditSummary;
use colored::Colorize;

/// Print the end-of-run summary block.
///
/// Called before the report export, so the findings stay on screen even
/// when the export fails.
pub fn print_summary(summary: &AuditSummary) {
    println!();
    println!("{}", "# Diagnostic settings audit".bold());
    println!("subscriptions scanned : {}", summary.subscriptions_scanned);
    println!("records               : {}", summary.total_records);
    println!(
        "configured            : {}",
        summary.configured_count.to_string().green()
    );
    let unconfigured = summary.unconfigured_count.to_string();
    println!(
        "unconfigured          : {}",
        if summary.unconfigured_count > 0 {
            unconfigured.red()
        } else {
            unconfigured.normal()
        }
    );

    if !summary.workspace_destination_counts.is_empty() {
        println!("workspace destinations:");
        for (workspace, count) in &summary.workspace_destination_counts {
            println!("  {workspace} : {count}");
        }
    }
}
