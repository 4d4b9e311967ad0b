//! Application state management.
//!
//! This module defines the shared state that is passed to all request handlers.
//! Everything in it is read-only after startup.

use std::sync::Arc;

use anyhow::Context;
use tidp_crypto::{AwsLcProvider, RsaSigningKey};
use tidp_saml::{Certificate, SamlError};

use crate::apps::{AppConfig, AppDirectory};
use crate::config::ServerConfig;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: ServerConfig,

    /// Digest, signing and randomness provider.
    pub crypto: AwsLcProvider,

    /// Key used to sign every assertion.
    pub signing_key: Arc<RsaSigningKey>,

    /// Certificate embedded in every signature.
    pub certificate: Arc<Certificate>,

    /// Registered applications.
    pub apps: Arc<AppDirectory>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(
        config: ServerConfig,
        signing_key: RsaSigningKey,
        certificate: Certificate,
        apps: AppDirectory,
    ) -> Self {
        Self {
            config,
            crypto: AwsLcProvider,
            signing_key: Arc::new(signing_key),
            certificate: Arc::new(certificate),
            apps: Arc::new(apps),
        }
    }

    /// Loads key, certificate and applications from the configured files.
    ///
    /// # Errors
    ///
    /// Returns an error if any file is missing or unusable.
    pub fn load(config: ServerConfig) -> anyhow::Result<Self> {
        let key_pem = std::fs::read_to_string(&config.signing_key_path).with_context(|| {
            format!("failed to read signing key {}", config.signing_key_path.display())
        })?;
        let signing_key = RsaSigningKey::from_pem(&key_pem).context("invalid signing key")?;

        let cert_pem = std::fs::read_to_string(&config.certificate_path).with_context(|| {
            format!("failed to read certificate {}", config.certificate_path.display())
        })?;
        let certificate = Certificate::from_pem(&cert_pem).context("invalid certificate")?;

        let apps = match &config.apps_file {
            Some(path) => AppDirectory::load(path)?,
            None => {
                tracing::warn!("TIDP_APPS_FILE not set, registering the demo app only");
                AppDirectory::demo()
            }
        };

        tracing::info!(
            key_bits = signing_key.modulus_bits(),
            apps = apps.len(),
            "Signing material loaded"
        );

        Ok(Self::new(config, signing_key, certificate, apps))
    }

    /// Looks up a registered application.
    ///
    /// # Errors
    ///
    /// Returns [`SamlError::UnknownApp`] if no application has this ID.
    pub fn app(&self, id: &str) -> Result<&AppConfig, SamlError> {
        self.apps
            .get(id)
            .ok_or_else(|| SamlError::UnknownApp(id.to_string()))
    }
}
