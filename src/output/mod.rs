//! Output formatting for allocation results.
//!
//! - [`json`] - machine readable output
//! - [`terminal`] - text output with colors

mod json;
mod report;
mod terminal;

pub use json::report_json;
pub use report::{Allocation, Report};
pub use terminal::{format_field, print_report, report_lines};

use crate::config::OutputFormat;
use std::error::Error;

/// Write a report to stdout in the chosen format.
pub fn emit(report: &Report, format: OutputFormat) -> Result<(), Box<dyn Error>> {
    match format {
        OutputFormat::Text => print_report(report),
        OutputFormat::Json => println!("{}", report_json(report)?),
    }
    Ok(())
}
