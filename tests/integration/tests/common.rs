//! Common test utilities and fixtures.

use std::net::TcpListener;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::{redirect, Client};
use tidp_crypto::RsaSigningKey;
use tokio::sync::oneshot;
use tokio::time::sleep;

use tidp_server::{Server, ServerConfig};

/// Test environment that runs a server on a free local port.
pub struct TestEnv {
    /// Base URL of the running server.
    pub base_url: String,
    /// HTTP client for testing. Redirects are not followed.
    pub client: Client,
    /// Server shutdown signal.
    _shutdown_tx: oneshot::Sender<()>,
}

impl TestEnv {
    /// Starts a server with the bundled test key and the demo app.
    pub async fn new() -> anyhow::Result<Self> {
        // Initialize tracing for tests
        let _ = tracing_subscriber::fmt()
            .with_env_filter("tidp_server=debug,tidp_saml=debug")
            .try_init();

        // Find available port for server
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let server_port = listener.local_addr()?.port();
        drop(listener);

        let base_url = format!("http://127.0.0.1:{}", server_port);

        // Create server config
        let mut config = ServerConfig::for_testing(
            testdata("test-key.pem"),
            testdata("test-cert.pem"),
        );
        config.host = "127.0.0.1".to_string();
        config.port = server_port;
        config.base_url = base_url.clone();

        // Create shutdown channel
        let (_shutdown_tx, shutdown_rx) = oneshot::channel();

        // Start server
        let server = Server::new(config)?;
        tokio::spawn(async move {
            tokio::select! {
                result = server.run() => {
                    if let Err(e) = result {
                        tracing::error!("Server error: {}", e);
                    }
                }
                _ = shutdown_rx => {
                    tracing::info!("Server shutdown requested");
                }
            }
        });

        // Wait for server
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .redirect(redirect::Policy::none())
            .build()?;

        wait_for_server(&client, &base_url).await?;

        Ok(Self {
            base_url,
            client,
            _shutdown_tx,
        })
    }

    /// Returns the URL of an endpoint of a registered app.
    pub fn app_url(&self, app_id: &str, endpoint: &str) -> String {
        format!("{}/apps/{}/{}", self.base_url, app_id, endpoint)
    }
}

/// Path of a file in the crypto crate's test data.
pub fn testdata(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../crates/tidp-crypto/testdata")
        .join(name)
}

/// Public key matching the server's signing key.
pub fn test_public_key() -> anyhow::Result<Vec<u8>> {
    let pem = std::fs::read_to_string(testdata("test-key.pem"))?;
    Ok(RsaSigningKey::from_pem(&pem)?.public_key_der())
}

/// Extracts the value of a hidden form input.
pub fn hidden_field<'a>(html: &'a str, name: &str) -> Option<&'a str> {
    let marker = format!(r#"name="{name}" value=""#);
    let start = html.find(&marker)? + marker.len();
    let len = html[start..].find('"')?;
    Some(&html[start..start + len])
}

/// Returns the first `<tag ...>...</tag>` element, tags included.
pub fn element<'a>(xml: &'a str, tag: &str) -> Option<&'a str> {
    let start = xml.find(&format!("<{tag}"))?;
    let close = format!("</{tag}>");
    let end = xml[start..].find(&close)? + start + close.len();
    Some(&xml[start..end])
}

/// Returns the text content of the first `<tag>` element.
pub fn text_of<'a>(xml: &'a str, tag: &str) -> Option<&'a str> {
    let el = element(xml, tag)?;
    let start = el.find('>')? + 1;
    let end = el.rfind("</")?;
    Some(&el[start..end])
}

/// Waits for the server to be ready.
async fn wait_for_server(client: &Client, base_url: &str) -> anyhow::Result<()> {
    let health_url = format!("{}/health", base_url);
    let max_attempts = 50;

    for attempt in 1..=max_attempts {
        match client.get(&health_url).send().await {
            Ok(response) if response.status().is_success() => {
                tracing::info!("Server ready after {} attempts", attempt);
                return Ok(());
            }
            Ok(response) => {
                tracing::debug!(
                    "Server not ready (status {}), attempt {}/{}",
                    response.status(),
                    attempt,
                    max_attempts
                );
            }
            Err(e) => {
                tracing::debug!(
                    "Server not ready ({}), attempt {}/{}",
                    e,
                    attempt,
                    max_attempts
                );
            }
        }
        sleep(Duration::from_millis(100)).await;
    }

    anyhow::bail!("Server did not become ready in time")
}
