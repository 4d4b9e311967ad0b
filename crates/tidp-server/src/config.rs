//! Server configuration.
//!
//! Configuration is loaded from environment variables with sensible defaults.

use std::path::PathBuf;

use chrono::TimeDelta;

/// Upper bound for `TIDP_ASSERTION_LIFETIME_SECS` (one week).
pub const MAX_ASSERTION_LIFETIME_SECS: i64 = 7 * 24 * 60 * 60;

/// Default assertion lifetime (5 minutes).
const DEFAULT_ASSERTION_LIFETIME_SECS: i64 = 300;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server host to bind to.
    pub host: String,

    /// Server port.
    pub port: u16,

    /// Base URL for the server (used in entity IDs and generated URLs).
    pub base_url: String,

    /// PEM file holding the RSA signing key (PKCS#8 or PKCS#1).
    pub signing_key_path: PathBuf,

    /// PEM file holding the signing certificate.
    pub certificate_path: PathBuf,

    /// How long issued assertions stay valid, in seconds.
    pub assertion_lifetime_secs: i64,

    /// JSON file listing registered applications (optional).
    pub apps_file: Option<PathBuf>,

    /// Log level.
    pub log_level: String,
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or the assertion
    /// lifetime is not a positive number of seconds up to
    /// [`MAX_ASSERTION_LIFETIME_SECS`].
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();

        let host = std::env::var("TIDP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("TIDP_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let base_url = std::env::var("TIDP_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{port}"));

        let signing_key_path = std::env::var("TIDP_SIGNING_KEY_PATH")
            .map(PathBuf::from)
            .map_err(|_| anyhow::anyhow!("TIDP_SIGNING_KEY_PATH environment variable is required"))?;

        let certificate_path = std::env::var("TIDP_CERTIFICATE_PATH")
            .map(PathBuf::from)
            .map_err(|_| anyhow::anyhow!("TIDP_CERTIFICATE_PATH environment variable is required"))?;

        let assertion_lifetime_secs =
            parse_lifetime(std::env::var("TIDP_ASSERTION_LIFETIME_SECS").ok().as_deref())?;

        let apps_file = std::env::var("TIDP_APPS_FILE").ok().map(PathBuf::from);

        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            host,
            port,
            base_url: base_url.trim_end_matches('/').to_string(),
            signing_key_path,
            certificate_path,
            assertion_lifetime_secs,
            apps_file,
            log_level,
        })
    }

    /// Creates a configuration for testing.
    #[must_use]
    pub fn for_testing(signing_key_path: impl Into<PathBuf>, certificate_path: impl Into<PathBuf>) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0, // Random port
            base_url: "http://localhost:8080".to_string(),
            signing_key_path: signing_key_path.into(),
            certificate_path: certificate_path.into(),
            assertion_lifetime_secs: DEFAULT_ASSERTION_LIFETIME_SECS,
            apps_file: None,
            log_level: "debug".to_string(),
        }
    }

    /// Returns the assertion validity window, or `None` if the configured
    /// seconds do not fit a [`TimeDelta`].
    #[must_use]
    pub fn assertion_lifetime(&self) -> Option<TimeDelta> {
        TimeDelta::try_seconds(self.assertion_lifetime_secs)
    }

    /// Returns the IdP entity ID presented to the given application.
    #[must_use]
    pub fn idp_entity_id(&self, app_id: &str) -> String {
        format!("{}/apps/{}", self.base_url, app_id)
    }

    /// Returns the absolute SSO endpoint URL for the given application.
    #[must_use]
    pub fn sso_url(&self, app_id: &str) -> String {
        format!("{}/apps/{}/sso", self.base_url, app_id)
    }
}

fn parse_lifetime(raw: Option<&str>) -> anyhow::Result<i64> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_ASSERTION_LIFETIME_SECS);
    };
    let secs: i64 = raw
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("TIDP_ASSERTION_LIFETIME_SECS is not a number: {raw}"))?;
    if secs <= 0 || secs > MAX_ASSERTION_LIFETIME_SECS {
        anyhow::bail!(
            "TIDP_ASSERTION_LIFETIME_SECS must be between 1 and {MAX_ASSERTION_LIFETIME_SECS}, got {secs}"
        );
    }
    TimeDelta::try_seconds(secs)
        .ok_or_else(|| anyhow::anyhow!("TIDP_ASSERTION_LIFETIME_SECS out of range: {secs}"))?;
    Ok(secs)
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            base_url: "http://localhost:8080".to_string(),
            signing_key_path: PathBuf::from("signing-key.pem"),
            certificate_path: PathBuf::from("signing-cert.pem"),
            assertion_lifetime_secs: DEFAULT_ASSERTION_LIFETIME_SECS,
            apps_file: None,
            log_level: "info".to_string(),
        }
    }
}
