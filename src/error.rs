//! Error taxonomy for an audit run.
//!
//! Every failure is classified exactly once as fatal-abort or
//! recoverable-skip. Nothing is retried.

use thiserror::Error;

pub type AuditResult<T> = Result<T, AuditError>;

#[derive(Debug, Error)]
pub enum AuditError {
    /// No active Azure session. Fatal, before any work starts.
    #[error("no active Azure session, run 'az login' first")]
    AuthenticationMissing,

    /// A specifically requested subscription id did not resolve. Fatal.
    #[error("subscription not found: {0}")]
    SubscriptionNotFound(String),

    /// Resource listing failed; the subscription is skipped and the run
    /// continues with the next one.
    #[error("resource enumeration failed for subscription {subscription}: {reason}")]
    ResourceEnumerationFailure {
        subscription: String,
        reason: String,
    },

    /// Diagnostic settings could not be fetched; the resource is reported
    /// as unconfigured.
    #[error("diagnostic settings fetch failed for {resource}: {reason}")]
    DiagnosticFetchFailure { resource: String, reason: String },

    /// Report serialization failed. Fatal, but raised only after the
    /// console summary has been printed.
    #[error("report export failed: {0}")]
    ExportFailure(String),

    /// Snapshot file could not be read, parsed or written.
    #[error("snapshot error: {0}")]
    Snapshot(String),

    /// An `az` invocation failed before its output could be classified.
    #[error("azure cli: {0}")]
    Cli(String),
}
