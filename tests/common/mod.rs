use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use store_api::auth::{generate_jwt, Claims};
use store_api::config::{AppConfig, StorageBackend};
use store_api::database::MemoryCategoryStore;
use store_api::{router, AppState};

pub const TEST_SECRET: &str = "integration-test-secret";

pub struct TestServer {
    pub base_url: String,
    pub config: AppConfig,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Serve the real router on a free port, backed by an empty in-memory store
    pub async fn spawn() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut config = AppConfig::development();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = port;
        config.database.backend = StorageBackend::Memory;
        config.security.jwt_secret = TEST_SECRET.to_string();

        let state = AppState::new(config.clone(), Arc::new(MemoryCategoryStore::new()));
        let listener = tokio::net::TcpListener::bind(config.bind_addr())
            .await
            .context("failed to bind test listener")?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, router(state)).await;
        });

        let server = Self {
            base_url,
            config,
            client: reqwest::Client::new(),
        };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// A valid bearer token for the running server
    pub fn token(&self) -> Result<String> {
        let claims = Claims::new("integration", &self.config.security)?;
        Ok(generate_jwt(&claims, &self.config.security)?)
    }
}
