//! Report output.
//!
//! This module handles presenting and exporting audit results:
//! - [`write_report`] / [`report_file_name`] - CSV report serialization
//! - [`print_summary`] - console summary

mod csv;
mod terminal;

// Re-export public functions
pub use self::csv::{report_file_name, write_report};
pub use self::terminal::print_summary;
