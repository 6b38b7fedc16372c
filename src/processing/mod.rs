//! Audit pipeline processing.
//!
//! This module contains the business logic of the audit:
//! - [`normalize_setting`] - reconciling raw settings into canonical records
//! - [`run_audit`] / [`summarize`] - run orchestration, failure isolation,
//!   summary statistics

mod aggregate;
mod normalize;

// Re-export public functions
pub use aggregate::{run_audit, summarize, AuditOptions, AuditRun};
pub use normalize::normalize_setting;
