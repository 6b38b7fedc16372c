//! Command-line surface and derived run options.

use crate::models::ResourceFilter;
use crate::processing::AuditOptions;
use clap::Parser;
use std::path::PathBuf;

/// Audit diagnostic-settings coverage across Azure subscriptions.
///
/// Walks every resource the session can see, fetches its diagnostic
/// settings and writes one normalized CSV row per setting (or one
/// unconfigured row per bare resource).
#[derive(Parser, Debug)]
#[command(name = "azure-diag-audit", version, about)]
pub struct AuditArgs {
    /// Audit only this subscription id; all visible subscriptions otherwise
    #[arg(long, short = 's')]
    pub subscription_id: Option<String>,

    /// Only audit resources in this resource group
    #[arg(long, short = 'g')]
    pub resource_group: Option<String>,

    /// Only audit resources of this type, e.g. 'Microsoft.KeyVault/vaults'
    #[arg(long, short = 't')]
    pub resource_type: Option<String>,

    /// Directory the CSV report is written into
    #[arg(long, default_value = ".")]
    pub output_path: PathBuf,

    /// Worker threads for the per-resource fetch step; 1 = sequential
    #[arg(long, default_value_t = 1)]
    pub parallel: usize,

    /// Snapshot file: replayed when it exists, recorded otherwise
    #[arg(long)]
    pub snapshot: Option<PathBuf>,
}

impl AuditArgs {
    pub fn options(&self) -> AuditOptions {
        AuditOptions {
            subscription_id: self.subscription_id.clone(),
            filter: ResourceFilter {
                resource_group: self.resource_group.clone(),
                resource_type: self.resource_type.clone(),
            },
            parallel: self.parallel.max(1),
        }
    }

    /// Scope token used in the report file name.
    pub fn scope_label(&self) -> String {
        self.subscription_id
            .clone()
            .unwrap_or_else(|| "AllSubscriptions".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        AuditArgs::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = AuditArgs::parse_from(["azure-diag-audit"]);
        assert!(args.subscription_id.is_none());
        assert_eq!(args.output_path, PathBuf::from("."));
        assert_eq!(args.parallel, 1);
        assert_eq!(args.scope_label(), "AllSubscriptions");
    }

    #[test]
    fn test_filters_flow_into_options() {
        let args = AuditArgs::parse_from([
            "azure-diag-audit",
            "-s",
            "11111111-1111-1111-1111-111111111111",
            "-g",
            "rg-app",
            "-t",
            "Microsoft.KeyVault/vaults",
            "--parallel",
            "4",
        ]);
        let options = args.options();
        assert_eq!(
            options.subscription_id.as_deref(),
            Some("11111111-1111-1111-1111-111111111111")
        );
        assert_eq!(options.filter.resource_group.as_deref(), Some("rg-app"));
        assert_eq!(
            options.filter.resource_type.as_deref(),
            Some("Microsoft.KeyVault/vaults")
        );
        assert_eq!(options.parallel, 4);
        assert_eq!(args.scope_label(), "11111111-1111-1111-1111-111111111111");
    }

    #[test]
    fn test_parallel_zero_clamps_to_sequential() {
        let args = AuditArgs::parse_from(["azure-diag-audit", "--parallel", "0"]);
        assert_eq!(args.options().parallel, 1);
    }
}
