//! Provider configuration

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use filing_git::Credentials;

use crate::{Error, Result};

/// Fetch interval used when the configuration does not supply one.
pub const DEFAULT_FETCH_INTERVAL: Duration = Duration::from_secs(60);

/// Immutable configuration for one git-backed filing provider instance.
///
/// `remote`, `local_path`, and `branch` are required; construction fails
/// without them. Credentials are optional and are combined into a connection
/// descriptor only at the point of use, never embedded in the URL.
#[derive(Clone, Deserialize)]
pub struct RepositoryConfig {
    /// Remote repository URL
    pub remote: String,

    /// Filesystem root of the working copy
    pub local_path: PathBuf,

    /// The single tracked branch
    pub branch: String,

    /// Username for authenticated remotes
    #[serde(default)]
    pub username: Option<String>,

    /// Password or token for authenticated remotes
    #[serde(default)]
    pub password: Option<String>,

    /// Background fetch interval in milliseconds
    #[serde(default)]
    pub fetch_interval_ms: Option<u64>,
}

impl RepositoryConfig {
    /// Create a configuration with the three required fields.
    pub fn new(
        remote: impl Into<String>,
        local_path: impl Into<PathBuf>,
        branch: impl Into<String>,
    ) -> Self {
        Self {
            remote: remote.into(),
            local_path: local_path.into(),
            branch: branch.into(),
            username: None,
            password: None,
            fetch_interval_ms: None,
        }
    }

    /// Attach remote credentials.
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Override the background fetch interval.
    pub fn with_fetch_interval(mut self, interval: Duration) -> Self {
        self.fetch_interval_ms = Some(interval.as_millis() as u64);
        self
    }

    /// Load a configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = filing_fs::io::read_text(path)?;
        let config: Self = toml::from_str(&text).map_err(|e| Error::InvalidConfig {
            message: format!("Failed to parse {}: {e}", path.display()),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check that all required fields are present.
    pub fn validate(&self) -> Result<()> {
        if self.remote.trim().is_empty() {
            return Err(Error::InvalidConfig {
                message: "'remote' is required".into(),
            });
        }
        if self.local_path.as_os_str().is_empty() {
            return Err(Error::InvalidConfig {
                message: "'local_path' is required".into(),
            });
        }
        if self.branch.trim().is_empty() {
            return Err(Error::InvalidConfig {
                message: "'branch' is required".into(),
            });
        }
        Ok(())
    }

    /// Effective background fetch interval.
    pub fn fetch_interval(&self) -> Duration {
        self.fetch_interval_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_FETCH_INTERVAL)
    }

    /// Remote credentials, when both halves are configured.
    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => Some(Credentials {
                username: username.clone(),
                password: password.clone(),
            }),
            _ => None,
        }
    }
}

impl std::fmt::Debug for RepositoryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepositoryConfig")
            .field("remote", &self.remote)
            .field("local_path", &self.local_path)
            .field("branch", &self.branch)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("fetch_interval_ms", &self.fetch_interval_ms)
            .finish()
    }
}
