//! Azure subscription model.

use serde::{Deserialize, Serialize};

/// An Azure subscription, as returned by `az account list` and
/// `az account show`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    /// Subscription id (GUID).
    pub id: String,
    /// Subscription display name.
    #[serde(rename = "name")]
    pub display_name: String,
}
