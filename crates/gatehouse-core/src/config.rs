//! Access-control configuration
//!
//! Built once at process start and threaded explicitly into every
//! component constructor. No component reads ambient environment state
//! after construction.
//!
//! A deployment is either private (the default) or public; there is no
//! third mode. The struct stores only `private_mode`, so public mode is
//! structurally its negation and the two can never diverge. While the
//! deployment is private, invite-only access is always in force.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that opts a deployment out of private mode.
pub const ENV_PUBLIC_OVERRIDE: &str = "PRIVATE_MODE_PUBLIC_OVERRIDE";
/// Environment variable naming the deployment's home realm URL.
pub const ENV_ALLOWED_REALM: &str = "ALLOWED_REALM_URL";
/// Environment variable for the base data directory.
pub const ENV_DATA_DIR: &str = "DATA_DIR";

const DEFAULT_DATA_DIR: &str = "./.data";

/// Process-wide access-control configuration, immutable after startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessControlConfig {
    private_mode: bool,
    allowed_realm: Option<String>,
    data_dir: PathBuf,
}

impl AccessControlConfig {
    /// Build a configuration explicitly
    pub fn new(private_mode: bool, allowed_realm: Option<String>, data_dir: PathBuf) -> Self {
        let config = Self {
            private_mode,
            allowed_realm,
            data_dir,
        };
        config.warn_on_missing_realm();
        config
    }

    /// Read configuration from the environment, once, at startup
    pub fn from_env() -> Self {
        let public = std::env::var(ENV_PUBLIC_OVERRIDE)
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        let allowed_realm = std::env::var(ENV_ALLOWED_REALM)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        let data_dir = std::env::var(ENV_DATA_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR));
        Self::new(!public, allowed_realm, data_dir)
    }

    /// Whether the deployment is private (the default)
    pub fn private_mode(&self) -> bool {
        self.private_mode
    }

    /// Whether the deployment is public, always the negation of private
    pub fn public_mode(&self) -> bool {
        !self.private_mode
    }

    /// Whether out-of-realm principals require an invitation
    ///
    /// Cannot be disabled independently while the deployment is private.
    pub fn invite_only(&self) -> bool {
        self.private_mode
    }

    /// The deployment's home realm URL, if configured
    pub fn allowed_realm(&self) -> Option<&str> {
        self.allowed_realm.as_deref()
    }

    /// Base directory for pre-auth durable state
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    // Private mode with no realm to compare against is a misconfiguration:
    // the policy engine fails open. Warn at construction so the log line
    // appears exactly once per process.
    fn warn_on_missing_realm(&self) {
        if self.private_mode && self.allowed_realm.is_none() {
            tracing::warn!(
                "private mode is active but {} is not set; \
                 login checks will allow all realms",
                ENV_ALLOWED_REALM
            );
        }
    }
}

impl Default for AccessControlConfig {
    fn default() -> Self {
        Self {
            private_mode: true,
            allowed_realm: None,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}
