//! Test helpers for integration tests
//!
//! A `TestServer` owns a running app; each `TestClient` is one browser with
//! its own cookie jar, so several users can act against the same server.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{multipart, Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use social_api::server::serve;
use social_api::{create_app, create_app_state, AppState};
use social_common::AppConfig;
use social_core::Snowflake;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    state: AppState,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server on an ephemeral port
    pub async fn start() -> Result<Self> {
        Self::start_with_config(test_config()?).await
    }

    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let state = create_app_state(config).await?;
        let app = create_app(state.clone())?;

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            if let Err(e) = serve(listener, app).await {
                eprintln!("test server stopped: {e}");
            }
        });

        Ok(Self {
            addr,
            state,
            _handle: handle,
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// A fresh client with an empty cookie jar
    pub fn client(&self) -> Result<TestClient> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(TestClient {
            base_url: self.base_url(),
            client,
        })
    }

    /// Issue a reset token directly, standing in for the emailed link
    pub async fn issue_reset_token(&self, user_id: &str) -> Result<String> {
        let user_id = Snowflake::parse(user_id).context("user id")?;
        let token = self
            .state
            .service_context()
            .reset_tokens()
            .issue(user_id)
            .await?;
        Ok(token)
    }
}

/// One browser session against the test server
pub struct TestClient {
    base_url: String,
    client: Client,
}

impl TestClient {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    pub async fn post(&self, path: &str) -> Result<Response> {
        Ok(self.client.post(self.url(path)).send().await?)
    }

    pub async fn post_json<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        Ok(self.client.post(self.url(path)).json(body).send().await?)
    }

    pub async fn put_json<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        Ok(self.client.put(self.url(path)).json(body).send().await?)
    }

    pub async fn put_multipart(&self, path: &str, form: multipart::Form) -> Result<Response> {
        Ok(self.client.put(self.url(path)).multipart(form).send().await?)
    }

    pub async fn delete(&self, path: &str) -> Result<Response> {
        Ok(self.client.delete(self.url(path)).send().await?)
    }
}

/// Configuration from the environment, with rate limiting off so parallel
/// tests do not trip the global bucket
pub fn test_config() -> Result<AppConfig> {
    dotenvy::dotenv().ok();

    let mut config = AppConfig::from_env().map_err(|e| anyhow::anyhow!("Config error: {e}"))?;
    config.rate_limit.enabled = false;
    config.storage.upload_dir = std::env::temp_dir()
        .join("social-integration-uploads")
        .to_string_lossy()
        .into_owned();

    Ok(config)
}

/// Integration tests only run when both backing services are configured
pub fn check_test_env() -> bool {
    for key in ["DATABASE_URL", "REDIS_URL"] {
        if std::env::var(key).is_err() {
            eprintln!("Skipping test: {key} not set");
            return false;
        }
    }
    true
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(response: Response, expected_status: StatusCode) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}
