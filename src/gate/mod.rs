//! Host-facing gate
//!
//! Orchestrates one resolution pass: detect the environment, load the policy
//! file, and expose the two option-interception entry points the host wires
//! in ahead of its plugin loader. Construction is explicit; the host builds
//! one gate per request or process and drops it afterwards.

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::config::{ConfigError, ConfigStore};
use crate::environment::EnvironmentSignals;
use crate::inventory::InventoryProvider;
use crate::policy::PolicyResolver;
use crate::reconcile::PluginReconciler;

/// One resolution pass over the host's activation state
#[derive(Debug)]
pub struct PluginGate<I> {
    reconciler: PluginReconciler<I>,
}

impl<I: InventoryProvider> PluginGate<I> {
    /// Detect the environment from process signals and load the policy.
    ///
    /// `platform_constant` is the host's environment-type constant, if it
    /// defines one. Fails only when the config file exists but is broken and
    /// the environment is not `production`.
    pub fn open(
        config_path: &Path,
        platform_constant: Option<String>,
        inventory: I,
    ) -> Result<Self, ConfigError> {
        let environment = EnvironmentSignals::from_process(platform_constant).resolve();
        Self::open_in(config_path, &environment, inventory)
    }

    /// Load the policy for an already-resolved environment name.
    pub fn open_in(
        config_path: &Path,
        environment: &str,
        inventory: I,
    ) -> Result<Self, ConfigError> {
        let store = ConfigStore::load(config_path, environment)?;
        debug!(environment, "plugin gate ready");
        Ok(Self::from_store(store, inventory))
    }

    /// Assemble a gate from a pre-built store (embedded hosts, tests).
    pub fn from_store(store: ConfigStore, inventory: I) -> Self {
        Self {
            reconciler: PluginReconciler::new(PolicyResolver::new(store), inventory),
        }
    }

    /// Interception point for the host's active-plugins option.
    ///
    /// Must run before any plugin code executes; the returned value replaces
    /// what the host reads from storage.
    pub fn filter_active_plugins(&self, plugins: Value) -> Value {
        self.reconciler.filter_active_value(plugins)
    }

    /// Interception point for the host's network-wide active-plugins option.
    pub fn filter_network_active_plugins(&self, plugins: Value) -> Value {
        self.reconciler.filter_network_active_value(plugins)
    }

    pub fn environment(&self) -> &str {
        self.reconciler.policy().environment()
    }

    pub fn config(&self) -> &ConfigStore {
        self.reconciler.policy().store()
    }

    pub fn reconciler(&self) -> &PluginReconciler<I> {
        &self.reconciler
    }

    /// Installed plugins currently disabled by policy.
    pub fn disabled_installed_count(&self) -> usize {
        self.reconciler.disabled_installed_count()
    }

    /// Installed plugins currently required by policy.
    pub fn required_installed_count(&self) -> usize {
        self.reconciler.required_installed_count()
    }

    /// Required plugins that are not installed.
    pub fn required_missing_count(&self) -> usize {
        self.reconciler.required_missing_count()
    }
}
