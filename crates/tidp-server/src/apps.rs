//! Registered service provider applications.
//!
//! Each application gets its own IdP entity ID and SSO endpoint under
//! `/apps/{id}`. Applications are read once at startup from a JSON array:
//!
//! ```json
//! [{"id": "demo", "name": "Demo SP",
//!   "sp_entity_id": "https://sp.example.com",
//!   "sp_acs_url": "https://sp.example.com/acs"}]
//! ```

use std::collections::HashSet;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// A service provider the IdP issues assertions to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// URL path segment identifying the application.
    pub id: String,
    /// Display name shown on the login page.
    pub name: String,
    /// SP entity ID, used as the assertion audience.
    pub sp_entity_id: String,
    /// SP Assertion Consumer Service URL.
    pub sp_acs_url: String,
}

/// Immutable set of registered applications.
#[derive(Debug, Clone, Default)]
pub struct AppDirectory {
    apps: Vec<AppConfig>,
}

impl AppDirectory {
    /// Builds a directory, validating every entry.
    ///
    /// # Errors
    ///
    /// Returns an error on duplicate or non-path-safe IDs, empty fields or
    /// an ACS URL that is not an absolute URL.
    pub fn new(apps: Vec<AppConfig>) -> anyhow::Result<Self> {
        let mut seen = HashSet::new();
        for app in &apps {
            let id_ok = !app.id.is_empty()
                && app
                    .id
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'));
            if !id_ok {
                anyhow::bail!("app id '{}' must be non-empty [A-Za-z0-9_-]", app.id);
            }
            if !seen.insert(app.id.as_str()) {
                anyhow::bail!("duplicate app id '{}'", app.id);
            }
            if app.name.trim().is_empty() || app.sp_entity_id.trim().is_empty() {
                anyhow::bail!("app '{}' needs a name and sp_entity_id", app.id);
            }
            url::Url::parse(&app.sp_acs_url)
                .with_context(|| format!("app '{}' has an invalid sp_acs_url", app.id))?;
        }
        Ok(Self { apps })
    }

    /// Parses a JSON array of applications.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or an entry is invalid.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let apps: Vec<AppConfig> =
            serde_json::from_str(json).context("apps file is not a JSON array of apps")?;
        Self::new(apps)
    }

    /// Loads applications from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read apps file {}", path.display()))?;
        Self::from_json(&json)
    }

    /// The directory used when no apps file is configured.
    #[must_use]
    pub fn demo() -> Self {
        Self {
            apps: vec![AppConfig {
                id: "demo".to_string(),
                name: "Demo SP".to_string(),
                sp_entity_id: "https://sp.example.com".to_string(),
                sp_acs_url: "https://sp.example.com/acs".to_string(),
            }],
        }
    }

    /// Looks up an application by ID.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&AppConfig> {
        self.apps.iter().find(|app| app.id == id)
    }

    /// Iterates over all applications in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &AppConfig> {
        self.apps.iter()
    }

    /// Returns the number of registered applications.
    #[must_use]
    pub fn len(&self) -> usize {
        self.apps.len()
    }

    /// Returns true if no application is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }
}
