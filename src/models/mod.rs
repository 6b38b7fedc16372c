//! Domain models for the diagnostic audit.
//!
//! This module contains the core data structures used throughout the
//! application:
//! - [`Subscription`] - an audited subscription scope
//! - [`ResourceDescriptor`] / [`ResourceFilter`] - enumerated resources
//! - [`DiagnosticRecord`] / [`AuditSummary`] - canonical output

mod record;
mod resource;
mod subscription;

/// One raw diagnostic setting exactly as the provider returned it.
///
/// The shape varies across provider API versions (singular vs. plural list
/// names, changing key casing, absent destinations), so it stays an opaque
/// JSON object until normalization.
pub type RawDiagnosticSetting = serde_json::Map<String, serde_json::Value>;

// Re-export public types
pub use record::{AuditSummary, DiagnosticRecord};
pub use resource::{ResourceDescriptor, ResourceFilter};
pub use subscription::Subscription;
