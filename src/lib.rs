//! Managed Plugins - environment-aware plugin activation gate
//!
//! This crate decides which plugins a CMS host is permitted to activate. It
//! rewrites the host's "active plugins" option before the host acts on it:
//! plugins disabled by policy are removed, plugins required by policy are
//! force-added when installed. Policy comes from a declarative JSON file with
//! global rules plus per-environment overrides.
//!
//! The host's plugin loader, admin UI, and bootstrap remain external; this
//! crate only reads the config file, queries a host-supplied installed
//! inventory, and transforms active-plugin values handed to it.

pub mod config;
pub mod environment;
pub mod gate;
pub mod inventory;
pub mod policy;
pub mod reconcile;

pub use config::{ConfigError, ConfigStore, PolicyDocument, RuleSet};
pub use environment::EnvironmentSignals;
pub use gate::PluginGate;
pub use inventory::{InventoryProvider, MapInventory, PluginInfo};
pub use policy::PolicyResolver;
pub use reconcile::PluginReconciler;
