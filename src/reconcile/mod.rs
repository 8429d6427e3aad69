//! Active-list reconciliation
//!
//! Applies the effective policy to the two shapes the host stores activation
//! state in: the ordered active-plugins list and the network-wide map of
//! identifier to activation timestamp. Both follow the same algorithm:
//! remove disabled entries, append required entries that are installed and
//! not already present, deduplicate. A disabled identifier never appears in
//! the output even when it is also required.
//!
//! The reconciliation path never returns errors; it sits on the host's
//! page-render path and absorbs malformed input by passing it through.

use std::cell::OnceCell;
use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;
use serde_json::Value;

use crate::inventory::InventoryProvider;
use crate::policy::PolicyResolver;

/// Reconciles activation state against the effective policy for one pass.
///
/// The installed-inventory snapshot is fetched lazily and at most once, on
/// the first operation that actually needs it.
#[derive(Debug)]
pub struct PluginReconciler<I> {
    policy: PolicyResolver,
    inventory: I,
    installed: OnceCell<BTreeSet<String>>,
}

impl<I: InventoryProvider> PluginReconciler<I> {
    pub fn new(policy: PolicyResolver, inventory: I) -> Self {
        Self {
            policy,
            inventory,
            installed: OnceCell::new(),
        }
    }

    pub fn policy(&self) -> &PolicyResolver {
        &self.policy
    }

    fn installed(&self) -> &BTreeSet<String> {
        self.installed.get_or_init(|| self.inventory.installed_ids())
    }

    /// Reconcile the ordered active list.
    ///
    /// Surviving entries keep their input order; required additions are
    /// appended in policy order. The result is dense and duplicate-free.
    pub fn filter_active(&self, plugins: &[String]) -> Vec<String> {
        let disabled = self.policy.disabled();

        let mut filtered: Vec<String> = if disabled.is_empty() {
            plugins.to_vec()
        } else {
            plugins
                .iter()
                .filter(|id| !disabled.contains(id))
                .cloned()
                .collect()
        };

        let required = self.policy.required();
        if !required.is_empty() {
            let installed = self.installed();
            for id in required {
                // Disabled wins when an identifier is listed in both sets.
                if installed.contains(id) && !disabled.contains(id) && !filtered.contains(id) {
                    filtered.push(id.clone());
                }
            }
        }

        dedup_first_seen(filtered)
    }

    /// Reconcile the network-wide activation map.
    ///
    /// Required additions are stamped with the current wall-clock time, the
    /// same value the host would record on a manual network activation.
    pub fn filter_network_active(&self, plugins: &BTreeMap<String, i64>) -> BTreeMap<String, i64> {
        let disabled = self.policy.disabled();

        let mut filtered: BTreeMap<String, i64> = plugins
            .iter()
            .filter(|(id, _)| !disabled.contains(id))
            .map(|(id, stamp)| (id.clone(), *stamp))
            .collect();

        let required = self.policy.required();
        if !required.is_empty() {
            let installed = self.installed();
            let now = Utc::now().timestamp();
            for id in required {
                if installed.contains(id) && !disabled.contains(id) && !filtered.contains_key(id) {
                    filtered.insert(id.clone(), now);
                }
            }
        }

        filtered
    }

    /// Reconcile the raw option value holding the active list.
    ///
    /// Non-array input is returned unchanged; the host stores option values
    /// untyped and a crash here would take down its render path. Non-string
    /// entries survive the removal pass untouched and deduplicate by value.
    pub fn filter_active_value(&self, raw: Value) -> Value {
        let Value::Array(entries) = raw else {
            return raw;
        };

        let disabled = self.policy.disabled();
        let mut filtered: Vec<Value> = if disabled.is_empty() {
            entries
        } else {
            entries
                .into_iter()
                .filter(|entry| match entry.as_str() {
                    Some(id) => !disabled.iter().any(|d| d == id),
                    None => true,
                })
                .collect()
        };

        let required = self.policy.required();
        if !required.is_empty() {
            let installed = self.installed();
            for id in required {
                if installed.contains(id)
                    && !disabled.contains(id)
                    && !filtered.iter().any(|entry| entry.as_str() == Some(id.as_str()))
                {
                    filtered.push(Value::String(id.clone()));
                }
            }
        }

        let mut unique: Vec<Value> = Vec::with_capacity(filtered.len());
        for entry in filtered {
            if !unique.contains(&entry) {
                unique.push(entry);
            }
        }
        Value::Array(unique)
    }

    /// Reconcile the raw option value holding the network activation map.
    ///
    /// Non-object input is returned unchanged. Surviving keys keep their
    /// stored timestamp value whatever its type.
    pub fn filter_network_active_value(&self, raw: Value) -> Value {
        let Value::Object(entries) = raw else {
            return raw;
        };

        let disabled = self.policy.disabled();
        let mut filtered = serde_json::Map::with_capacity(entries.len());
        for (id, stamp) in entries {
            if !disabled.contains(&id) {
                filtered.insert(id, stamp);
            }
        }

        let required = self.policy.required();
        if !required.is_empty() {
            let installed = self.installed();
            let now = Utc::now().timestamp();
            for id in required {
                if installed.contains(id) && !disabled.contains(id) && !filtered.contains_key(id) {
                    filtered.insert(id.clone(), Value::from(now));
                }
            }
        }

        Value::Object(filtered)
    }

    /// Number of disabled plugins that are actually installed.
    pub fn disabled_installed_count(&self) -> usize {
        let disabled = self.policy.disabled();
        if disabled.is_empty() {
            return 0;
        }
        let installed = self.installed();
        disabled.iter().filter(|id| installed.contains(*id)).count()
    }

    /// Number of required plugins that are installed.
    pub fn required_installed_count(&self) -> usize {
        let required = self.policy.required();
        if required.is_empty() {
            return 0;
        }
        let installed = self.installed();
        required.iter().filter(|id| installed.contains(*id)).count()
    }

    /// Number of required plugins that are missing from the inventory.
    pub fn required_missing_count(&self) -> usize {
        let required = self.policy.required();
        if required.is_empty() {
            return 0;
        }
        let installed = self.installed();
        required
            .iter()
            .filter(|id| !installed.contains(*id))
            .count()
    }
}

fn dedup_first_seen(list: Vec<String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    list.into_iter()
        .filter(|id| seen.insert(id.clone()))
        .collect()
}
