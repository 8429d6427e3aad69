//! One-pass policy resolution
//!
//! Thin memoizing facade over the config store. The effective disabled and
//! required sets are computed on first read and reused for every subsequent
//! read in the same pass, so repeated filtering within one request can never
//! see two different merges of the same document. There is no mutation API:
//! a new pass means a new resolver over a freshly loaded store.

use std::cell::OnceCell;

use crate::config::ConfigStore;

/// Memoized effective policy for one resolution pass
#[derive(Debug)]
pub struct PolicyResolver {
    store: ConfigStore,
    disabled: OnceCell<Vec<String>>,
    required: OnceCell<Vec<String>>,
}

impl PolicyResolver {
    pub fn new(store: ConfigStore) -> Self {
        Self {
            store,
            disabled: OnceCell::new(),
            required: OnceCell::new(),
        }
    }

    /// Effective disabled set (global ∪ environment), computed once.
    pub fn disabled(&self) -> &[String] {
        self.disabled.get_or_init(|| self.store.disabled_plugins())
    }

    /// Effective required set (global ∪ environment), computed once.
    pub fn required(&self) -> &[String] {
        self.required.get_or_init(|| self.store.required_plugins())
    }

    pub fn environment(&self) -> &str {
        self.store.environment()
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }
}
