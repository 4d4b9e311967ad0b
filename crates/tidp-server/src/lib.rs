//! # tidp-server
//!
//! HTTP front end of the test SAML identity provider.
//!
//! Every registered application gets:
//! - `/apps/{id}/sso` - SSO endpoint for HTTP-Redirect and HTTP-POST requests
//! - `/apps/{id}/login` - login form; submitting it posts a signed response
//!   to the service provider
//!
//! plus `/health` and an index of applications at `/`.
//!
//! ## Usage
//!
//! ```ignore
//! use tidp_server::{Server, ServerConfig};
//!
//! let config = ServerConfig::from_env()?;
//! let server = Server::new(config)?;
//! server.run().await?;
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod apps;
pub mod config;
pub mod login;
pub mod pages;
pub mod router;
pub mod sso;
pub mod state;

pub use apps::{AppConfig, AppDirectory};
pub use config::ServerConfig;
pub use router::create_router;
pub use state::AppState;

use std::net::SocketAddr;

use tokio::net::TcpListener;

/// The test IdP server.
pub struct Server {
    config: ServerConfig,
    state: AppState,
}

impl Server {
    /// Creates a new server instance.
    ///
    /// This loads the signing key, certificate and application list.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured file is missing or invalid.
    pub fn new(config: ServerConfig) -> anyhow::Result<Self> {
        let state = AppState::load(config.clone())?;
        Ok(Self { config, state })
    }

    /// Runs the server.
    ///
    /// This starts the HTTP server and blocks until it receives a shutdown signal.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound.
    pub async fn run(self) -> anyhow::Result<()> {
        let app = create_router(self.state);

        // Bind to address
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port).parse()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on http://{}", addr);

        // Run server with graceful shutdown
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

/// Waits for a shutdown signal.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
