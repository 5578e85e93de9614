//! Persisted settings.
//!
//! Stored as TOML in the platform config directory, or at the path given
//! with `--config`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use breath_client::ServiceEndpoints;
use breath_core::{DEFAULT_PAGE_SIZE, UserId};
use breath_ingest::DEFAULT_PARSE_TIMEOUT;
use breath_model::DiagnosticCatalog;
use serde::{Deserialize, Serialize};

// =============================================================================
// ROOT SETTINGS
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where the external services live.
    pub services: ServiceEndpoints,

    /// Upload parsing and preview.
    pub ingest: IngestSettings,

    /// Training options.
    pub training: TrainingSettings,

    /// Signed-in user.
    pub user: UserSettings,
}

impl Settings {
    /// Loads settings.
    ///
    /// An explicit path must exist and parse. The default file may be
    /// missing (defaults apply) and is ignored with a warning if malformed.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => {
                let path = Self::config_path();
                if !path.exists() {
                    tracing::debug!(path = %path.display(), "no settings file, using defaults");
                    return Ok(Self::default());
                }
                Ok(Self::load_from(&path).unwrap_or_else(|error| {
                    tracing::warn!(path = %path.display(), %error, "ignoring unreadable settings");
                    Self::default()
                }))
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read settings {}", path.display()))?;
        let settings = toml::from_str(&content)
            .with_context(|| format!("parse settings {}", path.display()))?;
        tracing::debug!(path = %path.display(), "settings loaded");
        Ok(settings)
    }

    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("org", "Breath", "breath")
            .map(|dirs| dirs.config_dir().join("settings.toml"))
            .unwrap_or_else(|| PathBuf::from("settings.toml"))
    }

    /// The user from `--email`, falling back to the settings file.
    pub fn user(&self, override_email: Option<&str>) -> Option<UserId> {
        override_email
            .or(self.user.email.as_deref())
            .and_then(UserId::new)
    }
}

// =============================================================================
// SECTIONS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestSettings {
    /// Bounded wait for parsing an upload, in milliseconds.
    pub parse_timeout_ms: u64,

    /// Rows per preview page.
    pub page_size: usize,
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            parse_timeout_ms: DEFAULT_PARSE_TIMEOUT.as_millis() as u64,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl IngestSettings {
    pub fn parse_timeout(&self) -> Duration {
        Duration::from_millis(self.parse_timeout_ms)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingSettings {
    /// Diagnostic codes a model can be trained for.
    pub diagnostic_codes: DiagnosticCatalog,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    /// Account email sent to the model registry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}
