//! Policy file loading and per-environment rule union
//!
//! Failure policy on an existing-but-broken file depends on the environment:
//! in `production` the store logs the error and degrades to the empty policy
//! so a bad config can never take a live site down; everywhere else the error
//! is surfaced fatally so it gets fixed before it reaches production.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, error};

use super::document::PolicyDocument;
use crate::environment::PRODUCTION;

/// Errors from loading the policy file.
///
/// A missing file is not an error (the policy is optional); only an existing
/// file that cannot be read or parsed is reported.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {detail}")]
    Unreadable { path: PathBuf, detail: String },

    #[error("failed to parse config file {path}: {detail}")]
    Malformed { path: PathBuf, detail: String },
}

/// A loaded policy document bound to one environment
#[derive(Debug, Clone)]
pub struct ConfigStore {
    document: PolicyDocument,
    environment: String,
}

impl ConfigStore {
    /// Load the policy file for the given environment.
    ///
    /// Missing file: `Ok` with the empty policy. Unreadable or unparsable
    /// file: `Ok` with the empty policy (logged) when the environment is
    /// `production`, `Err` otherwise.
    pub fn load(path: &Path, environment: &str) -> Result<Self, ConfigError> {
        let document = match Self::read_document(path) {
            Ok(document) => document,
            Err(err) if environment == PRODUCTION => {
                // Fail open: policy enforcement is lost, site availability is not.
                error!("managed-plugins: {err}");
                PolicyDocument::empty()
            }
            Err(err) => {
                error!("managed-plugins: {err}");
                return Err(err);
            }
        };

        debug!(
            environment,
            disabled = document.global.disabled.len(),
            required = document.global.required.len(),
            "policy config loaded"
        );

        Ok(Self::from_document(document, environment))
    }

    /// Wrap an already-normalized document (host supplied or test fixture).
    pub fn from_document(document: PolicyDocument, environment: &str) -> Self {
        Self {
            document,
            environment: environment.to_string(),
        }
    }

    fn read_document(path: &Path) -> Result<PolicyDocument, ConfigError> {
        // Config file is optional.
        if !path.exists() {
            return Ok(PolicyDocument::empty());
        }

        let content = fs::read_to_string(path).map_err(|err| ConfigError::Unreadable {
            path: path.to_path_buf(),
            detail: err.to_string(),
        })?;

        let raw: serde_json::Value =
            serde_json::from_str(&content).map_err(|err| ConfigError::Malformed {
                path: path.to_path_buf(),
                detail: err.to_string(),
            })?;

        Ok(PolicyDocument::from_value(&raw))
    }

    /// Disabled plugins for this environment: global entries first in document
    /// order, then environment-specific entries not already present.
    pub fn disabled_plugins(&self) -> Vec<String> {
        union(
            &self.document.global.disabled,
            self.document
                .rules_for(&self.environment)
                .map(|rules| rules.disabled.as_slice()),
        )
    }

    /// Required plugins for this environment, same union order as
    /// [`disabled_plugins`](Self::disabled_plugins).
    pub fn required_plugins(&self) -> Vec<String> {
        union(
            &self.document.global.required,
            self.document
                .rules_for(&self.environment)
                .map(|rules| rules.required.as_slice()),
        )
    }

    pub fn document(&self) -> &PolicyDocument {
        &self.document
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }
}

/// Global ∪ environment-specific, deduplicated, global first.
fn union(global: &[String], scoped: Option<&[String]>) -> Vec<String> {
    let mut merged = global.to_vec();
    if let Some(entries) = scoped {
        for id in entries {
            if !merged.contains(id) {
                merged.push(id.clone());
            }
        }
    }
    merged
}
