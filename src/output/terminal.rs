//! Terminal output.

use super::Report;
use colored::Colorize;
use itertools::Itertools;

/// Format a value as a quoted, right-aligned field.
///
/// # Arguments
/// * `value` - The value to format
/// * `width` - The minimum width of the field
pub fn format_field<T: ToString>(value: T, width: usize) -> String {
    let value_str = value.to_string();
    let quoted = format!("\"{value_str}\"");
    if quoted.len() >= width {
        quoted
    } else {
        format!("{quoted:>width$}")
    }
}

/// Render a report as aligned text lines.
pub fn report_lines(report: &Report) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(parent) = &report.parent {
        lines.push(format!("parent {}", parent.bold()));
    }
    for allocation in &report.allocations {
        lines.push(format!(
            "{request} {result}",
            request = format_field(&allocation.request, 8),
            result = allocation.result.green()
        ));
    }
    lines.push(format!(
        "occupied [{}]",
        report.occupied.iter().join(" ").dimmed()
    ));
    lines
}

/// Print a report to stdout.
pub fn print_report(report: &Report) {
    for line in report_lines(report) {
        println!("{line}");
    }
}
