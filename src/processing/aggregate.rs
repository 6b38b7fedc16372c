//! Audit orchestration.
//!
//! Drives subscriptions in resolver order and resources in enumerator
//! order, one forward pass, no retries. Failures are isolated at the
//! granularity the stage allows: a subscription that cannot be enumerated
//! is skipped with a warning, a resource whose settings cannot be fetched
//! is reported as unconfigured.

use crate::azure::AzureProvider;
use crate::error::{AuditError, AuditResult};
use crate::models::{
    AuditSummary, DiagnosticRecord, ResourceDescriptor, ResourceFilter, Subscription,
};
use crate::processing::normalize_setting;
use colored::Colorize;
use itertools::Itertools;
use std::collections::BTreeMap;

/// Options for one audit run.
#[derive(Debug, Default, Clone)]
pub struct AuditOptions {
    /// Audit only this subscription; all visible subscriptions when `None`.
    pub subscription_id: Option<String>,
    pub filter: ResourceFilter,
    /// Worker threads for the per-resource fetch step; 0 or 1 = sequential.
    pub parallel: usize,
}

/// Everything a finished run produces.
#[derive(Debug, Clone)]
pub struct AuditRun {
    /// Records in subscription, resource, setting order.
    pub records: Vec<DiagnosticRecord>,
    pub summary: AuditSummary,
}

/// Continuation decision of one pipeline stage. The driving loop inspects
/// the tag instead of relying on error control flow.
enum StageOutcome<T> {
    Success(T),
    Skip(String),
    Fatal(AuditError),
}

/// Run the full audit against `provider`.
pub fn run_audit<P: AzureProvider + Sync>(
    provider: &P,
    options: &AuditOptions,
) -> AuditResult<AuditRun> {
    let context = provider.current_context()?;
    log::info!("signed in as {}", context.user_name().unwrap_or("<unknown>"));

    let subscriptions = match resolve_subscriptions(provider, options.subscription_id.as_deref()) {
        StageOutcome::Success(subscriptions) => subscriptions,
        StageOutcome::Skip(reason) => {
            log::warn!("{reason}");
            Vec::new()
        }
        StageOutcome::Fatal(error) => return Err(error),
    };
    if subscriptions.is_empty() {
        log::warn!("no subscriptions visible to this session, nothing to audit");
    }

    let mut records: Vec<DiagnosticRecord> = Vec::new();
    let mut subscriptions_scanned = 0usize;

    for (index, subscription) in subscriptions.iter().enumerate() {
        log::info!(
            "auditing subscription {name} ({id}) [{n}/{total}]",
            name = subscription.display_name.on_blue(),
            id = subscription.id,
            n = index + 1,
            total = subscriptions.len()
        );

        let resources = match enumerate_resources(provider, subscription, &options.filter) {
            StageOutcome::Success(resources) => resources,
            StageOutcome::Skip(reason) => {
                log::warn!(
                    "{skipped} subscription {id}: {reason}",
                    skipped = "skipped".on_red(),
                    id = subscription.id
                );
                continue;
            }
            StageOutcome::Fatal(error) => return Err(error),
        };
        subscriptions_scanned += 1;
        log::info!("got {} resources", resources.len());

        if options.parallel > 1 {
            records.extend(audit_resources_parallel(
                provider,
                subscription,
                &resources,
                options.parallel,
            ));
        } else {
            for resource in &resources {
                records.extend(audit_resource(provider, subscription, resource));
            }
        }
    }

    let summary = summarize(subscriptions_scanned, &records);
    Ok(AuditRun { records, summary })
}

/// Resolve the target subscriptions: one specific id, or everything the
/// session can see. Both lookups are fatal when they fail.
fn resolve_subscriptions<P: AzureProvider>(
    provider: &P,
    requested: Option<&str>,
) -> StageOutcome<Vec<Subscription>> {
    let resolved = match requested {
        Some(id) => provider
            .find_subscription(id)
            .map(|subscription| vec![subscription]),
        None => provider.list_subscriptions(),
    };
    match resolved {
        Ok(subscriptions) => StageOutcome::Success(subscriptions),
        Err(error) => StageOutcome::Fatal(error),
    }
}

/// Switch context and list resources. Any failure here is recoverable at
/// subscription granularity.
fn enumerate_resources<P: AzureProvider>(
    provider: &P,
    subscription: &Subscription,
    filter: &ResourceFilter,
) -> StageOutcome<Vec<ResourceDescriptor>> {
    if let Err(error) = provider.set_active_subscription(subscription) {
        return StageOutcome::Skip(format!("context switch failed: {error}"));
    }
    match provider.list_resources(subscription, filter) {
        Ok(resources) => StageOutcome::Success(resources),
        Err(error) => StageOutcome::Skip(error.to_string()),
    }
}

/// Audit one resource: fetch its settings and normalize each one. A failed
/// fetch reads as "no settings"; many resource types never support
/// diagnostics and the provider has no capability check to ask first.
fn audit_resource<P: AzureProvider>(
    provider: &P,
    subscription: &Subscription,
    resource: &ResourceDescriptor,
) -> Vec<DiagnosticRecord> {
    let settings = match provider.diagnostic_settings(&resource.resource_id) {
        Ok(settings) => settings,
        Err(error) => {
            log::debug!("treating {} as unconfigured: {error}", resource.resource_id);
            Vec::new()
        }
    };
    if settings.is_empty() {
        vec![DiagnosticRecord::unconfigured(subscription, resource)]
    } else {
        settings
            .iter()
            .map(|setting| normalize_setting(subscription, resource, setting))
            .collect()
    }
}

/// Fan the fetch step out over at most `workers` scoped threads. Each
/// worker fills a local list keyed by enumerator index; the merge restores
/// enumerator order with a stable sort, so the output is identical to the
/// sequential path.
fn audit_resources_parallel<P: AzureProvider + Sync>(
    provider: &P,
    subscription: &Subscription,
    resources: &[ResourceDescriptor],
    workers: usize,
) -> Vec<DiagnosticRecord> {
    let indexed: Vec<(usize, &ResourceDescriptor)> = resources.iter().enumerate().collect();
    let chunk_size = indexed.len().div_ceil(workers).max(1);

    let mut partials: Vec<(usize, Vec<DiagnosticRecord>)> = std::thread::scope(|scope| {
        let handles: Vec<_> = indexed
            .chunks(chunk_size)
            .map(|chunk| {
                scope.spawn(move || {
                    chunk
                        .iter()
                        .map(|&(index, resource)| {
                            (index, audit_resource(provider, subscription, resource))
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|handle| handle.join().expect("audit worker panicked"))
            .collect()
    });

    partials.sort_by_key(|(index, _)| *index);
    partials
        .into_iter()
        .flat_map(|(_, records)| records)
        .collect()
}

/// Derive the run summary from the finished record collection.
pub fn summarize(subscriptions_scanned: usize, records: &[DiagnosticRecord]) -> AuditSummary {
    let configured_count = records.iter().filter(|record| record.configured).count();
    let workspace_destination_counts: BTreeMap<String, usize> = records
        .iter()
        .filter_map(|record| record.workspace_name.clone())
        .counts()
        .into_iter()
        .collect();

    AuditSummary {
        subscriptions_scanned,
        total_records: records.len(),
        configured_count,
        unconfigured_count: records.len() - configured_count,
        workspace_destination_counts,
    }
}
