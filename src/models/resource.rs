//! Auditable resource models.

use serde::{Deserialize, Serialize};

/// Minimal identifying record for one auditable resource, as returned by
/// `az resource list`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ResourceDescriptor {
    /// Full resource id path.
    #[serde(rename = "id")]
    pub resource_id: String,
    /// Resource name.
    pub name: String,
    /// Provider type, e.g. `Microsoft.KeyVault/vaults`.
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Resource group containing the resource.
    #[serde(rename = "resourceGroup", default)]
    pub resource_group: String,
    /// Azure region.
    #[serde(default)]
    pub location: String,
}

/// Filters applied when enumerating resources in a subscription.
#[derive(Debug, Default, Clone)]
pub struct ResourceFilter {
    pub resource_group: Option<String>,
    pub resource_type: Option<String>,
}

impl ResourceFilter {
    /// True when the descriptor passes both filters. Matching is
    /// case-insensitive, the same way the CLI treats these values.
    pub fn matches(&self, resource: &ResourceDescriptor) -> bool {
        let group_ok = self
            .resource_group
            .as_deref()
            .map_or(true, |group| group.eq_ignore_ascii_case(&resource.resource_group));
        let type_ok = self
            .resource_type
            .as_deref()
            .map_or(true, |kind| kind.eq_ignore_ascii_case(&resource.resource_type));
        group_ok && type_ok
    }
}
