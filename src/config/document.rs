//! Policy document types and normalization
//!
//! Normalization is a pure function from raw JSON to a fully-populated
//! document: shape mismatches never error, they collapse to the nearest
//! empty/valid shape. Only unreadable or unparsable input is reported, and
//! that happens one layer up in the store.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Disabled/required rule pair for one scope (global or a single environment)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Plugin identifiers that must never be active
    #[serde(default)]
    pub disabled: Vec<String>,

    /// Plugin identifiers that must be active when installed
    #[serde(default)]
    pub required: Vec<String>,
}

impl RuleSet {
    /// Normalize a raw JSON value into a rule set.
    ///
    /// Non-object input yields the empty set. Within each list, non-string
    /// entries are dropped and duplicates collapse to their first occurrence,
    /// preserving document order.
    pub fn from_value(raw: &Value) -> Self {
        match raw {
            Value::Object(map) => Self {
                disabled: string_entries(map.get("disabled")),
                required: string_entries(map.get("required")),
            },
            _ => Self::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.disabled.is_empty() && self.required.is_empty()
    }
}

/// Collect the string entries of a JSON array, first-seen dedup, in order.
fn string_entries(raw: Option<&Value>) -> Vec<String> {
    let mut entries = Vec::new();
    if let Some(Value::Array(items)) = raw {
        for item in items {
            if let Value::String(id) = item {
                if !entries.contains(id) {
                    entries.push(id.clone());
                }
            }
        }
    }
    entries
}

/// Full normalized policy: global rules plus per-environment overrides.
///
/// Both fields are always present after normalization; an absent or
/// malformed section in the source file becomes its empty equivalent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyDocument {
    /// Rules that apply in every environment
    #[serde(default)]
    pub global: RuleSet,

    /// Environment name (exact, case-sensitive) to its extra rules
    #[serde(default)]
    pub environments: BTreeMap<String, RuleSet>,
}

impl PolicyDocument {
    /// The canonical empty policy (used when the config file is absent).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Normalize raw JSON into a document.
    ///
    /// A non-object top level, or a missing/non-object `global` or
    /// `environments`, normalizes to empty rather than erroring.
    pub fn from_value(raw: &Value) -> Self {
        let Value::Object(map) = raw else {
            return Self::empty();
        };

        let global = RuleSet::from_value(map.get("global").unwrap_or(&Value::Null));

        let environments = match map.get("environments") {
            Some(Value::Object(envs)) => envs
                .iter()
                .map(|(name, rules)| (name.clone(), RuleSet::from_value(rules)))
                .collect(),
            _ => BTreeMap::new(),
        };

        Self {
            global,
            environments,
        }
    }

    /// Rules for a specific environment, if the document names it.
    pub fn rules_for(&self, environment: &str) -> Option<&RuleSet> {
        self.environments.get(environment)
    }
}
