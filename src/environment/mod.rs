//! Deployment environment detection
//!
//! Resolves the active environment name from external signals in strict
//! priority order, first non-empty wins:
//! 1. `WP_ENV` process environment variable (operator override)
//! 2. Host-defined environment constant (`WP_ENVIRONMENT_TYPE`), passed in by
//!    the host since the constant lives in its runtime
//! 3. Deployer marker file at `$HOME/deploy/shared/.environment`, trimmed
//! 4. `"production"`
//!
//! Detection is cheap and uncached; callers that need a stable value for a
//! pass resolve once and hold the result.

use std::env;
use std::fs;
use std::path::PathBuf;

/// Environment variable that overrides every other signal
pub const ENV_OVERRIDE_VAR: &str = "WP_ENV";

/// Marker file path relative to the process owner's home directory
pub const MARKER_FILE_RELATIVE: &str = "deploy/shared/.environment";

/// Default environment, also the one that fails open on config errors
pub const PRODUCTION: &str = "production";

/// The external signals environment detection reads.
///
/// Constructed from the live process via [`from_process`](Self::from_process),
/// or field by field for tests and embedded hosts.
#[derive(Debug, Clone, Default)]
pub struct EnvironmentSignals {
    /// Value of the `WP_ENV` environment variable, if set
    pub env_override: Option<String>,

    /// Value of the host's environment-type constant, if defined
    pub platform_constant: Option<String>,

    /// Location of the deployer marker file, if a home directory is known
    pub marker_file: Option<PathBuf>,
}

impl EnvironmentSignals {
    /// Sample the real process signals.
    ///
    /// `platform_constant` is whatever the host's configuration defines for
    /// its environment type (`None` when undefined).
    pub fn from_process(platform_constant: Option<String>) -> Self {
        Self {
            env_override: env::var(ENV_OVERRIDE_VAR).ok(),
            platform_constant,
            marker_file: env::var_os("HOME")
                .map(|home| PathBuf::from(home).join(MARKER_FILE_RELATIVE)),
        }
    }

    /// Resolve the environment name from these signals.
    pub fn resolve(&self) -> String {
        if let Some(name) = non_empty(self.env_override.as_deref()) {
            return name.to_string();
        }

        if let Some(name) = non_empty(self.platform_constant.as_deref()) {
            return name.to_string();
        }

        if let Some(path) = &self.marker_file {
            if let Ok(content) = fs::read_to_string(path) {
                let name = content.trim();
                if !name.is_empty() {
                    return name.to_string();
                }
            }
        }

        PRODUCTION.to_string()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_default_is_production() {
        let signals = EnvironmentSignals::default();
        assert_eq!(signals.resolve(), PRODUCTION);
    }

    #[test]
    fn test_env_override_wins() {
        let signals = EnvironmentSignals {
            env_override: Some("staging".to_string()),
            platform_constant: Some("development".to_string()),
            marker_file: None,
        };
        assert_eq!(signals.resolve(), "staging");
    }

    #[test]
    fn test_empty_override_falls_through_to_constant() {
        let signals = EnvironmentSignals {
            env_override: Some(String::new()),
            platform_constant: Some("development".to_string()),
            marker_file: None,
        };
        assert_eq!(signals.resolve(), "development");
    }

    #[test]
    fn test_marker_file_trimmed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".environment");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "  staging  ").unwrap();

        let signals = EnvironmentSignals {
            env_override: None,
            platform_constant: None,
            marker_file: Some(path),
        };
        assert_eq!(signals.resolve(), "staging");
    }

    #[test]
    fn test_blank_marker_file_falls_through_to_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".environment");
        std::fs::write(&path, "   \n").unwrap();

        let signals = EnvironmentSignals {
            env_override: None,
            platform_constant: None,
            marker_file: Some(path),
        };
        assert_eq!(signals.resolve(), PRODUCTION);
    }

    #[test]
    fn test_missing_marker_file_falls_through_to_default() {
        let dir = TempDir::new().unwrap();

        let signals = EnvironmentSignals {
            env_override: None,
            platform_constant: None,
            marker_file: Some(dir.path().join("missing")),
        };
        assert_eq!(signals.resolve(), PRODUCTION);
    }

    #[test]
    fn test_name_returned_verbatim_case_preserved() {
        let signals = EnvironmentSignals {
            env_override: Some("Staging".to_string()),
            platform_constant: None,
            marker_file: None,
        };
        assert_eq!(signals.resolve(), "Staging");
    }
}
