//! Normalization of raw diagnostic settings into canonical records.
//!
//! Provider API versions disagree about the shape of a diagnostic setting:
//! log and metric lists appear under singular or plural names, key casing
//! changes between transport layers, and destination ids come and go.
//! Normalization is a total function over that mess with one rule
//! everywhere: a missing or null field reads as "not enabled".

use crate::models::{DiagnosticRecord, RawDiagnosticSetting, ResourceDescriptor, Subscription};
use serde_json::{Map, Value};

/// Log-list field names, probed in order. When both are populated the
/// plural list contributes first and the singular entries are appended
/// after it, never merged or deduplicated.
const LOG_LISTS: [&str; 2] = ["logs", "log"];
/// Metric-list field names, probed the same way.
const METRIC_LISTS: [&str; 2] = ["metrics", "metric"];
/// Top-level category-group lists, distinct from per-log category groups.
const GROUP_LISTS: [&str; 2] = ["categoryGroups", "categoryGroup"];

/// Build the canonical record for one (resource, raw setting) pair.
///
/// `enabled_logs` is the ordered concatenation of log entries, metric
/// entries and top-level group entries, duplicates preserved.
pub fn normalize_setting(
    subscription: &Subscription,
    resource: &ResourceDescriptor,
    setting: &RawDiagnosticSetting,
) -> DiagnosticRecord {
    let workspace_id = text(setting, &["workspaceId"]);
    let workspace_name = workspace_id.as_deref().and_then(workspace_name_from_id);
    let storage_account_id = text(setting, &["storageAccountId"]);
    let event_hub_id = text(setting, &["eventHubAuthorizationRuleId", "eventHubId"]);

    let mut enabled_logs: Vec<String> = Vec::new();

    for entry in entries(setting, &LOG_LISTS) {
        if !enabled(entry) {
            continue;
        }
        if let Some(category) = text(entry, &["category"]) {
            enabled_logs.push(category);
        } else if let Some(group) = text(entry, &["categoryGroup"]) {
            enabled_logs.push(format!("Group:{group}"));
        }
    }

    for entry in entries(setting, &METRIC_LISTS) {
        if !enabled(entry) {
            continue;
        }
        if let Some(category) = text(entry, &["category"]) {
            enabled_logs.push(format!("Metric:{category}"));
        }
    }

    for entry in entries(setting, &GROUP_LISTS) {
        if !enabled(entry) {
            continue;
        }
        if let Some(group) = text(entry, &["categoryGroup", "name"]) {
            enabled_logs.push(format!("Group:{group}"));
        }
    }

    DiagnosticRecord {
        subscription_name: subscription.display_name.clone(),
        subscription_id: subscription.id.clone(),
        resource_name: resource.name.clone(),
        resource_type: resource.resource_type.clone(),
        resource_group: resource.resource_group.clone(),
        location: resource.location.clone(),
        configured: true,
        setting_name: text(setting, &["name"]),
        enabled_logs,
        workspace_id,
        workspace_name,
        storage_account_id,
        event_hub_id,
    }
}

/// Path segment immediately following the literal `/workspaces/`.
fn workspace_name_from_id(workspace_id: &str) -> Option<String> {
    let tail = workspace_id.split_once("/workspaces/")?.1;
    let name = tail.split('/').next().unwrap_or_default();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Case-insensitive field lookup; JSON null reads as absent.
fn field<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    object
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(key))
        .map(|(_, value)| value)
        .filter(|value| !value.is_null())
}

/// First non-empty string found under any of the candidate keys.
fn text(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|&key| field(object, key))
        .filter_map(Value::as_str)
        .find(|value| !value.is_empty())
        .map(|value| value.to_string())
}

/// Concatenated entry objects from every candidate list field, in probe
/// order. Non-list fields and non-object entries contribute nothing.
fn entries<'a>(setting: &'a Map<String, Value>, keys: &[&str]) -> Vec<&'a Map<String, Value>> {
    keys.iter()
        .filter_map(|&key| field(setting, key))
        .filter_map(Value::as_array)
        .flatten()
        .filter_map(Value::as_object)
        .collect()
}

/// The entry's own enabled flag; absent or non-boolean reads as disabled.
fn enabled(entry: &Map<String, Value>) -> bool {
    field(entry, "enabled")
        .and_then(Value::as_bool)
        .unwrap_or(false)
}
