//! Snapshot capture and replay of audit input data.
//!
//! A snapshot stores exactly what the provider returned during one run:
//! the subscriptions, each subscription's resources, and each resource's
//! raw diagnostic settings. An existing snapshot file replays without
//! touching Azure, so a recorded inventory can be re-sliced offline.

use super::provider::{AzureProvider, SessionContext};
use crate::error::{AuditError, AuditResult};
use crate::models::{RawDiagnosticSetting, ResourceDescriptor, ResourceFilter, Subscription};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Recorded control-plane responses for one audit run.
#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub struct AuditSnapshot {
    pub subscriptions: Vec<Subscription>,
    /// Resources keyed by subscription id.
    #[serde(default)]
    pub resources: BTreeMap<String, Vec<ResourceDescriptor>>,
    /// Raw diagnostic settings keyed by resource id.
    #[serde(default)]
    pub settings: BTreeMap<String, Vec<RawDiagnosticSetting>>,
}

impl AuditSnapshot {
    /// Read a snapshot from a JSON file.
    pub fn load(path: &Path) -> AuditResult<Self> {
        log::info!("reading snapshot file: {}", path.display());
        let json = std::fs::read_to_string(path)
            .map_err(|e| AuditError::Snapshot(format!("read {}: {e}", path.display())))?;
        serde_json::from_str(&json)
            .map_err(|e| AuditError::Snapshot(format!("parse {}: {e}", path.display())))
    }

    /// Write the snapshot to a JSON file.
    pub fn save(&self, path: &Path) -> AuditResult<()> {
        log::info!("writing snapshot file: {}", path.display());
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| AuditError::Snapshot(format!("serialize: {e}")))?;
        std::fs::write(path, json)
            .map_err(|e| AuditError::Snapshot(format!("write {}: {e}", path.display())))
    }
}

/// Replays a recorded snapshot as if it were the live control plane.
pub struct SnapshotProvider {
    snapshot: AuditSnapshot,
}

impl SnapshotProvider {
    pub fn new(snapshot: AuditSnapshot) -> Self {
        Self { snapshot }
    }

    pub fn load(path: &Path) -> AuditResult<Self> {
        Ok(Self::new(AuditSnapshot::load(path)?))
    }
}

impl AzureProvider for SnapshotProvider {
    fn current_context(&self) -> AuditResult<SessionContext> {
        // Recorded data implies a session existed when it was captured.
        Ok(SessionContext::default())
    }

    fn list_subscriptions(&self) -> AuditResult<Vec<Subscription>> {
        Ok(self.snapshot.subscriptions.clone())
    }

    fn find_subscription(&self, id: &str) -> AuditResult<Subscription> {
        self.snapshot
            .subscriptions
            .iter()
            .find(|subscription| subscription.id.eq_ignore_ascii_case(id))
            .cloned()
            .ok_or_else(|| AuditError::SubscriptionNotFound(id.to_string()))
    }

    fn set_active_subscription(&self, _subscription: &Subscription) -> AuditResult<()> {
        Ok(())
    }

    fn list_resources(
        &self,
        subscription: &Subscription,
        filter: &ResourceFilter,
    ) -> AuditResult<Vec<ResourceDescriptor>> {
        // Filters are re-applied here so a broad snapshot can serve
        // narrower re-runs.
        let resources = self
            .snapshot
            .resources
            .get(&subscription.id)
            .cloned()
            .unwrap_or_default();
        Ok(resources
            .into_iter()
            .filter(|resource| filter.matches(resource))
            .collect())
    }

    fn diagnostic_settings(&self, resource_id: &str) -> AuditResult<Vec<RawDiagnosticSetting>> {
        Ok(self
            .snapshot
            .settings
            .get(resource_id)
            .cloned()
            .unwrap_or_default())
    }
}

/// Wraps another provider and captures everything it returns.
pub struct RecordingProvider<P> {
    inner: P,
    captured: Mutex<AuditSnapshot>,
}

impl<P: AzureProvider> RecordingProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            captured: Mutex::new(AuditSnapshot::default()),
        }
    }

    /// The snapshot accumulated so far.
    pub fn into_snapshot(self) -> AuditSnapshot {
        self.captured
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn captured(&self) -> MutexGuard<'_, AuditSnapshot> {
        self.captured
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<P: AzureProvider> AzureProvider for RecordingProvider<P> {
    fn current_context(&self) -> AuditResult<SessionContext> {
        self.inner.current_context()
    }

    fn list_subscriptions(&self) -> AuditResult<Vec<Subscription>> {
        let subscriptions = self.inner.list_subscriptions()?;
        self.captured().subscriptions = subscriptions.clone();
        Ok(subscriptions)
    }

    fn find_subscription(&self, id: &str) -> AuditResult<Subscription> {
        let subscription = self.inner.find_subscription(id)?;
        let mut captured = self.captured();
        if !captured
            .subscriptions
            .iter()
            .any(|known| known.id == subscription.id)
        {
            captured.subscriptions.push(subscription.clone());
        }
        Ok(subscription)
    }

    fn set_active_subscription(&self, subscription: &Subscription) -> AuditResult<()> {
        self.inner.set_active_subscription(subscription)
    }

    fn list_resources(
        &self,
        subscription: &Subscription,
        filter: &ResourceFilter,
    ) -> AuditResult<Vec<ResourceDescriptor>> {
        let resources = self.inner.list_resources(subscription, filter)?;
        self.captured()
            .resources
            .insert(subscription.id.clone(), resources.clone());
        Ok(resources)
    }

    fn diagnostic_settings(&self, resource_id: &str) -> AuditResult<Vec<RawDiagnosticSetting>> {
        let settings = self.inner.diagnostic_settings(resource_id)?;
        self.captured()
            .settings
            .insert(resource_id.to_string(), settings.clone());
        Ok(settings)
    }
}
