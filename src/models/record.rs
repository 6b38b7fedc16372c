//! Canonical audit output rows and the run summary.

use super::{ResourceDescriptor, Subscription};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One canonical audit row.
///
/// A resource with N diagnostic settings produces N of these, all
/// `configured = true`. A resource with no settings (or a failed fetch)
/// produces exactly one with `configured = false` and every optional
/// field `None`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticRecord {
    pub subscription_name: String,
    pub subscription_id: String,
    pub resource_name: String,
    pub resource_type: String,
    pub resource_group: String,
    pub location: String,
    /// Whether any diagnostic setting exists for the resource.
    pub configured: bool,
    /// Name of the diagnostic setting this row came from.
    pub setting_name: Option<String>,
    /// Enabled log/metric/group markers in provider order. Duplicates are
    /// kept; a category listed twice is reported twice.
    pub enabled_logs: Vec<String>,
    pub workspace_id: Option<String>,
    /// Workspace display name derived from the workspace id path.
    pub workspace_name: Option<String>,
    pub storage_account_id: Option<String>,
    pub event_hub_id: Option<String>,
}

impl DiagnosticRecord {
    /// Row for a resource without any diagnostic settings.
    pub fn unconfigured(subscription: &Subscription, resource: &ResourceDescriptor) -> Self {
        DiagnosticRecord {
            subscription_name: subscription.display_name.clone(),
            subscription_id: subscription.id.clone(),
            resource_name: resource.name.clone(),
            resource_type: resource.resource_type.clone(),
            resource_group: resource.resource_group.clone(),
            location: resource.location.clone(),
            configured: false,
            setting_name: None,
            enabled_logs: Vec::new(),
            workspace_id: None,
            workspace_name: None,
            storage_account_id: None,
            event_hub_id: None,
        }
    }

    /// `enabled_logs` rendered for the report: entries joined with `"; "`,
    /// or the literal `None` marker when the list is empty.
    pub fn enabled_logs_column(&self) -> String {
        if self.enabled_logs.is_empty() {
            "None".to_string()
        } else {
            self.enabled_logs.join("; ")
        }
    }
}

/// Statistics derived from a finished record collection.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AuditSummary {
    /// Subscriptions whose resource enumeration succeeded.
    pub subscriptions_scanned: usize,
    pub total_records: usize,
    pub configured_count: usize,
    pub unconfigured_count: usize,
    /// Configured-record count per workspace display name.
    pub workspace_destination_counts: BTreeMap<String, usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_logs(enabled_logs: Vec<String>) -> DiagnosticRecord {
        let subscription = Subscription {
            id: "s1".to_string(),
            display_name: "prod".to_string(),
        };
        let resource = ResourceDescriptor {
            resource_id: "/subscriptions/s1/x".to_string(),
            name: "x".to_string(),
            resource_type: "Microsoft.Storage/storageAccounts".to_string(),
            resource_group: "rg".to_string(),
            location: "westeurope".to_string(),
        };
        let mut record = DiagnosticRecord::unconfigured(&subscription, &resource);
        record.enabled_logs = enabled_logs;
        record
    }

    #[test]
    fn test_enabled_logs_column_joins_entries() {
        let record = record_with_logs(vec![
            "Admin".to_string(),
            "Group:allLogs".to_string(),
            "Metric:AllMetrics".to_string(),
        ]);
        assert_eq!(
            record.enabled_logs_column(),
            "Admin; Group:allLogs; Metric:AllMetrics"
        );
    }

    #[test]
    fn test_enabled_logs_column_empty_marker() {
        assert_eq!(record_with_logs(Vec::new()).enabled_logs_column(), "None");
    }

    #[test]
    fn test_unconfigured_row_has_no_optional_fields() {
        let record = record_with_logs(Vec::new());
        assert!(!record.configured);
        assert!(record.setting_name.is_none());
        assert!(record.workspace_id.is_none());
        assert!(record.workspace_name.is_none());
        assert!(record.storage_account_id.is_none());
        assert!(record.event_hub_id.is_none());
    }
}
