//! CSV report serialization.

use crate::error::{AuditError, AuditResult};
use crate::models::DiagnosticRecord;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// Report columns, in the order rows are written.
const HEADER: [&str; 13] = [
    "SubscriptionName",
    "SubscriptionId",
    "ResourceName",
    "ResourceType",
    "ResourceGroup",
    "Location",
    "DiagnosticsConfigured",
    "SettingName",
    "EnabledLogs",
    "WorkspaceName",
    "WorkspaceId",
    "StorageAccountId",
    "EventHubId",
];

/// Write the report into `output_dir` and return the full path.
pub fn write_report(
    records: &[DiagnosticRecord],
    output_dir: &Path,
    scope: &str,
) -> AuditResult<PathBuf> {
    let path = output_dir.join(report_file_name(scope, &Local::now()));
    log::info!("writing report: {}", path.display());

    let mut writer = csv::Writer::from_path(&path).map_err(export_error)?;
    writer.write_record(HEADER).map_err(export_error)?;
    for record in records {
        writer.write_record(row(record)).map_err(export_error)?;
    }
    writer.flush().map_err(export_error)?;

    Ok(path)
}

fn export_error<E: std::fmt::Display>(error: E) -> AuditError {
    AuditError::ExportFailure(error.to_string())
}

fn row(record: &DiagnosticRecord) -> Vec<String> {
    vec![
        record.subscription_name.clone(),
        record.subscription_id.clone(),
        record.resource_name.clone(),
        record.resource_type.clone(),
        record.resource_group.clone(),
        record.location.clone(),
        record.configured.to_string(),
        record.setting_name.clone().unwrap_or_default(),
        record.enabled_logs_column(),
        record.workspace_name.clone().unwrap_or_default(),
        record.workspace_id.clone().unwrap_or_default(),
        record.storage_account_id.clone().unwrap_or_default(),
        record.event_hub_id.clone().unwrap_or_default(),
    ]
}

/// Report file name: `AzureDiagAudit_<scope>_<yyyyMMdd-HHmm>.csv`.
pub fn report_file_name(scope: &str, stamp: &DateTime<Local>) -> String {
    format!(
        "AzureDiagAudit_{}_{}.csv",
        sanitize_scope(scope),
        stamp.format("%Y%m%d-%H%M")
    )
}

/// File names keep only characters that are safe on every filesystem.
fn sanitize_scope(scope: &str) -> String {
    let cleaned: String = scope
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "AllSubscriptions".to_string()
    } else {
        cleaned
    }
}
