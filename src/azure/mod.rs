//! Azure control-plane access.
//!
//! This module handles all Azure-related operations:
//! - [`cli`] - command execution for the Azure CLI
//! - [`AzureProvider`] / [`AzCli`] - the collaborator contract and its live
//!   implementation
//! - [`AuditSnapshot`] / [`SnapshotProvider`] / [`RecordingProvider`] -
//!   snapshot capture and replay of audit input data

pub mod cli;
mod provider;
mod snapshot;

// Re-export public types and functions
pub use provider::{AzCli, AzureProvider, SessionContext, SessionUser};
pub use snapshot::{AuditSnapshot, RecordingProvider, SnapshotProvider};
