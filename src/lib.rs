//! Audits whether diagnostic/telemetry export is configured for every
//! resource in one or more Azure subscriptions, and writes a normalized
//! CSV inventory of the findings.
//!
//! The pipeline: resolve target subscriptions, enumerate each one's
//! resources, fetch every resource's diagnostic settings, normalize the
//! raw settings into canonical records, then summarize and export.

pub mod azure;
pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod processing;

pub use error::{AuditError, AuditResult};
