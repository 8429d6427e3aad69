//! Policy configuration
//!
//! Loads the JSON policy file and normalizes it into a typed document:
//! 1. Global rules (apply everywhere)
//! 2. Per-environment rules (apply only when the environment name matches)
//!
//! The file is optional; a missing file is the empty policy. Read and parse
//! failures follow an environment-asymmetric policy: fail open in production,
//! fail loud anywhere else.

mod document;
mod store;

pub use document::{PolicyDocument, RuleSet};
pub use store::{ConfigError, ConfigStore};
