//! Installed plugin inventory seam
//!
//! The host supplies the set of installed (not necessarily active) plugins,
//! keyed by the same identifier scheme the policy uses. On a real deployment
//! this is a file-system scan, so callers treat one fetch as expensive and
//! snapshot the key set per pass.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Display metadata the host records per installed plugin.
///
/// The policy core only ever queries membership by identifier; the metadata
/// rides along for admin-facing collaborators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginInfo {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub version: String,
}

/// Host-supplied source of the installed plugin set
pub trait InventoryProvider {
    /// Snapshot of installed plugins keyed by identifier. Potentially
    /// expensive; callers fetch at most once per reconciliation pass.
    fn installed_plugins(&self) -> BTreeMap<String, PluginInfo>;

    /// Installed identifiers only.
    fn installed_ids(&self) -> BTreeSet<String> {
        self.installed_plugins().into_keys().collect()
    }
}

/// In-memory inventory backed by a plain map
#[derive(Debug, Clone, Default)]
pub struct MapInventory {
    plugins: BTreeMap<String, PluginInfo>,
}

impl MapInventory {
    pub fn new(plugins: BTreeMap<String, PluginInfo>) -> Self {
        Self { plugins }
    }

    /// Build from bare identifiers with empty metadata.
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            plugins: ids
                .into_iter()
                .map(|id| (id.into(), PluginInfo::default()))
                .collect(),
        }
    }
}

impl InventoryProvider for MapInventory {
    fn installed_plugins(&self) -> BTreeMap<String, PluginInfo> {
        self.plugins.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_ids() {
        let inventory = MapInventory::from_ids(["a/a.php", "b/b.php"]);
        let ids = inventory.installed_ids();

        assert_eq!(ids.len(), 2);
        assert!(ids.contains("a/a.php"));
        assert!(ids.contains("b/b.php"));
    }

    #[test]
    fn test_metadata_preserved() {
        let mut plugins = BTreeMap::new();
        plugins.insert(
            "a/a.php".to_string(),
            PluginInfo {
                name: "Plugin A".to_string(),
                version: "1.2.0".to_string(),
            },
        );

        let inventory = MapInventory::new(plugins);
        let snapshot = inventory.installed_plugins();
        assert_eq!(snapshot["a/a.php"].name, "Plugin A");
        assert_eq!(snapshot["a/a.php"].version, "1.2.0");
    }

    #[test]
    fn test_empty_inventory() {
        let inventory = MapInventory::default();
        assert!(inventory.installed_ids().is_empty());
    }
}
