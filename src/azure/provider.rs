//! The control-plane contract the audit consumes, and its live `az` CLI
//! implementation.

use super::cli;
use crate::error::{AuditError, AuditResult};
use crate::models::{RawDiagnosticSetting, ResourceDescriptor, ResourceFilter, Subscription};
use serde::Deserialize;
use serde_json::Value;

/// Identity attached to the active CLI session.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct SessionContext {
    #[serde(default)]
    pub user: Option<SessionUser>,
    #[serde(rename = "tenantId", default)]
    pub tenant_id: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct SessionUser {
    #[serde(default)]
    pub name: Option<String>,
}

impl SessionContext {
    /// Display name of the signed-in principal, when the session has one.
    pub fn user_name(&self) -> Option<&str> {
        self.user.as_ref().and_then(|user| user.name.as_deref())
    }
}

/// Control-plane operations consumed by the audit pipeline.
///
/// The listing call is scoped to the active session context rather than
/// parameterized per call, hence the explicit
/// [`set_active_subscription`](AzureProvider::set_active_subscription) step
/// before enumeration.
pub trait AzureProvider {
    /// Active session context. `AuthenticationMissing` when there is none.
    fn current_context(&self) -> AuditResult<SessionContext>;

    /// All subscriptions visible to the session, in directory order.
    fn list_subscriptions(&self) -> AuditResult<Vec<Subscription>>;

    /// Resolve one subscription by id. `SubscriptionNotFound` if it does
    /// not resolve.
    fn find_subscription(&self, id: &str) -> AuditResult<Subscription>;

    /// Switch the session context to the given subscription.
    fn set_active_subscription(&self, subscription: &Subscription) -> AuditResult<()>;

    /// Resources of the given (active) subscription matching `filter`.
    fn list_resources(
        &self,
        subscription: &Subscription,
        filter: &ResourceFilter,
    ) -> AuditResult<Vec<ResourceDescriptor>>;

    /// Raw diagnostic settings attached to one resource, possibly empty.
    fn diagnostic_settings(&self, resource_id: &str) -> AuditResult<Vec<RawDiagnosticSetting>>;
}

/// Live implementation backed by the `az` command-line client.
pub struct AzCli;

fn parse<T: serde::de::DeserializeOwned>(output: &str) -> Result<T, String> {
    let mut deserializer = serde_json::Deserializer::from_str(output);
    serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|e| format!("parse error at {}: {}", e.path(), e))
}

impl AzureProvider for AzCli {
    fn current_context(&self) -> AuditResult<SessionContext> {
        let output =
            cli::run("az account show --output json").map_err(|e| {
                log::debug!("no session context: {e}");
                AuditError::AuthenticationMissing
            })?;
        parse(&output).map_err(AuditError::Cli)
    }

    fn list_subscriptions(&self) -> AuditResult<Vec<Subscription>> {
        let output = cli::run("az account list --output json")?;
        parse(&output).map_err(AuditError::Cli)
    }

    fn find_subscription(&self, id: &str) -> AuditResult<Subscription> {
        let output = cli::run(&format!("az account show --subscription '{id}' --output json"))
            .map_err(|e| {
                log::debug!("subscription lookup failed: {e}");
                AuditError::SubscriptionNotFound(id.to_string())
            })?;
        parse(&output).map_err(AuditError::Cli)
    }

    fn set_active_subscription(&self, subscription: &Subscription) -> AuditResult<()> {
        cli::run(&format!("az account set --subscription '{}'", subscription.id)).map(|_| ())
    }

    fn list_resources(
        &self,
        subscription: &Subscription,
        filter: &ResourceFilter,
    ) -> AuditResult<Vec<ResourceDescriptor>> {
        let mut cmd = String::from("az resource list --output json");
        if let Some(group) = &filter.resource_group {
            cmd.push_str(&format!(" --resource-group '{group}'"));
        }
        if let Some(resource_type) = &filter.resource_type {
            cmd.push_str(&format!(" --resource-type '{resource_type}'"));
        }

        let enumeration_failure = |reason: String| AuditError::ResourceEnumerationFailure {
            subscription: subscription.id.clone(),
            reason,
        };
        let output = cli::run(&cmd).map_err(|e| enumeration_failure(e.to_string()))?;
        parse(&output).map_err(enumeration_failure)
    }

    fn diagnostic_settings(&self, resource_id: &str) -> AuditResult<Vec<RawDiagnosticSetting>> {
        let cmd = format!(
            "az monitor diagnostic-settings list --resource '{resource_id}' --output json"
        );
        let fetch_failure = |reason: String| AuditError::DiagnosticFetchFailure {
            resource: resource_id.to_string(),
            reason,
        };
        let output = cli::run(&cmd).map_err(|e| fetch_failure(e.to_string()))?;
        let value: Value =
            serde_json::from_str(&output).map_err(|e| fetch_failure(e.to_string()))?;
        Ok(unwrap_setting_list(value))
    }
}

/// Newer CLI builds return the settings as a bare array, older ones wrap
/// them in a `value` envelope. Anything else counts as no settings.
fn unwrap_setting_list(value: Value) -> Vec<RawDiagnosticSetting> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("value") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };
    items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(setting) => Some(setting),
            _ => None,
        })
        .collect()
}
