//! Integration tests for azure-diag-audit
//!
//! These tests drive the complete pipeline, from a recorded snapshot to
//! the exported CSV report.

use azure_diag_audit::azure::{AuditSnapshot, SnapshotProvider};
use azure_diag_audit::error::AuditError;
use azure_diag_audit::models::ResourceFilter;
use azure_diag_audit::output::write_report;
use azure_diag_audit::processing::{run_audit, AuditOptions};
use std::path::Path;

const PROD_SUB: &str = "11111111-1111-1111-1111-111111111111";
const SANDBOX_SUB: &str = "22222222-2222-2222-2222-222222222222";

fn fixture_provider() -> SnapshotProvider {
    let snapshot = AuditSnapshot::load(Path::new("src/tests/test_data/audit_snapshot_01.json"))
        .expect("Failed to read audit snapshot fixture");
    SnapshotProvider::new(snapshot)
}

#[test]
fn test_two_subscription_scenario() {
    let provider = fixture_provider();
    let run = run_audit(&provider, &AuditOptions::default()).expect("Audit failed");

    assert_eq!(run.records.len(), 2, "Expected one record per resource");
    assert_eq!(run.summary.subscriptions_scanned, 2);
    assert_eq!(run.summary.total_records, 2);
    assert_eq!(run.summary.configured_count, 1);
    assert_eq!(run.summary.unconfigured_count, 1);
    assert_eq!(run.summary.workspace_destination_counts.get("X"), Some(&1));

    // prod comes first (resolver order), and its vault has one setting
    let configured = &run.records[0];
    assert_eq!(configured.subscription_id, PROD_SUB);
    assert!(configured.configured);
    assert_eq!(configured.setting_name.as_deref(), Some("send-to-x"));
    assert_eq!(configured.enabled_logs, vec!["Admin".to_string()]);
    assert_eq!(configured.workspace_name.as_deref(), Some("X"));

    let unconfigured = &run.records[1];
    assert_eq!(unconfigured.subscription_id, SANDBOX_SUB);
    assert!(!unconfigured.configured);
    assert!(unconfigured.enabled_logs.is_empty());
    assert!(unconfigured.setting_name.is_none());
    assert!(unconfigured.workspace_id.is_none());
}

#[test]
fn test_summary_invariant_holds() {
    let provider = fixture_provider();
    let run = run_audit(&provider, &AuditOptions::default()).expect("Audit failed");

    let summary = &run.summary;
    assert_eq!(
        summary.configured_count + summary.unconfigured_count,
        summary.total_records
    );
    let destination_total: usize = summary.workspace_destination_counts.values().sum();
    assert!(destination_total <= summary.configured_count);
}

#[test]
fn test_single_subscription_scope() {
    let provider = fixture_provider();
    let options = AuditOptions {
        subscription_id: Some(SANDBOX_SUB.to_string()),
        ..AuditOptions::default()
    };
    let run = run_audit(&provider, &options).expect("Audit failed");

    assert_eq!(run.records.len(), 1);
    assert_eq!(run.records[0].subscription_id, SANDBOX_SUB);
    assert!(!run.records[0].configured);
    assert_eq!(run.summary.subscriptions_scanned, 1);
}

#[test]
fn test_unknown_subscription_is_fatal() {
    let provider = fixture_provider();
    let options = AuditOptions {
        subscription_id: Some("ffffffff-0000-0000-0000-000000000000".to_string()),
        ..AuditOptions::default()
    };
    let error = run_audit(&provider, &options);
    assert!(matches!(error, Err(AuditError::SubscriptionNotFound(_))));
}

#[test]
fn test_type_filter_narrows_enumeration() {
    let provider = fixture_provider();
    let options = AuditOptions {
        filter: ResourceFilter {
            resource_group: None,
            resource_type: Some("Microsoft.KeyVault/vaults".to_string()),
        },
        ..AuditOptions::default()
    };
    let run = run_audit(&provider, &options).expect("Audit failed");

    assert_eq!(run.records.len(), 1);
    assert_eq!(run.records[0].resource_name, "kv-app");
    assert!(run.records[0].configured);
    // both subscriptions were still enumerated, the filter just matched
    // nothing in the sandbox one
    assert_eq!(run.summary.subscriptions_scanned, 2);
}

#[test]
fn test_report_written_from_run() {
    let provider = fixture_provider();
    let run = run_audit(&provider, &AuditOptions::default()).expect("Audit failed");

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = write_report(&run.records, dir.path(), "AllSubscriptions")
        .expect("Failed to write report");

    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .expect("report path has no file name");
    assert!(name.starts_with("AzureDiagAudit_AllSubscriptions_"));
    assert!(name.ends_with(".csv"));

    let contents = std::fs::read_to_string(&path).expect("Failed to read report");
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 3, "header plus one row per record");
    assert!(lines[0].starts_with("SubscriptionName,SubscriptionId,ResourceName"));
    assert!(lines[1].contains("send-to-x"));
    assert!(lines[1].contains("Admin"));
    assert!(lines[2].contains("None"));
}

#[test]
fn test_parallel_run_keeps_record_order() {
    let provider = fixture_provider();
    let sequential = run_audit(&provider, &AuditOptions::default()).expect("Audit failed");
    let parallel = run_audit(
        &provider,
        &AuditOptions {
            parallel: 4,
            ..AuditOptions::default()
        },
    )
    .expect("Audit failed");

    assert_eq!(sequential.records, parallel.records);
    assert_eq!(sequential.summary, parallel.summary);
}
