#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

use mun_platform_api::config::AppConfig;
use mun_platform_api::services::{FixedFormatChecker, FormatCheckOutcome, FormatChecker};
use mun_platform_api::{app, AppState};

pub const TEST_SECRET: &str = "integration-test-signing-secret";

pub struct TestServer {
    pub base_url: String,
    pub state: AppState,
    pub client: reqwest::Client,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
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

    /// POST /auth/signup
    pub async fn signup(&self, email: &str, username: &str, password: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(self.url("/auth/signup"))
            .json(&json!({ "email": email, "username": username, "password": password }))
            .send()
            .await?)
    }

    /// POST /auth/login, returning the bearer token
    pub async fn login(&self, email: &str, password: &str) -> Result<String> {
        let res = self
            .client
            .post(self.url("/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());
        let body = res.json::<Value>().await?;
        body["access_token"]
            .as_str()
            .map(str::to_string)
            .context("missing access_token")
    }

    /// Sign up and log in, returning (user id, token)
    pub async fn register(&self, email: &str) -> Result<(String, String)> {
        let res = self.signup(email, "delegate", "p@ssw0rd").await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "signup failed: {}", res.status());
        let body = res.json::<Value>().await?;
        let id = body["id"].as_str().context("missing id")?.to_string();
        let token = self.login(email, "p@ssw0rd").await?;
        Ok((id, token))
    }

    /// POST /documents/ as the token holder
    pub async fn create_document(&self, token: &str, body: Value) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(self.url("/documents/"))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?)
    }
}

pub fn test_config() -> AppConfig {
    AppConfig::from_lookup(|name| match name {
        "STORAGE_BACKEND" => Some("memory".to_string()),
        "SECRET_KEY" => Some(TEST_SECRET.to_string()),
        "ACCESS_TOKEN_EXPIRE_MINUTES" => Some("5".to_string()),
        _ => None,
    })
    .expect("test configuration")
}

pub fn sample_document() -> Value {
    json!({
        "title": "Position Paper on Climate Finance",
        "type": "position_paper",
        "committee": "UNEP",
        "country": "Norway",
        "topic": "Climate finance",
        "content": "The Kingdom of Norway recognizes..."
    })
}

/// Spawn the app in-process with in-memory storage; format checks always pass.
pub async fn spawn_server() -> Result<TestServer> {
    spawn_server_with(Arc::new(FixedFormatChecker(FormatCheckOutcome::valid()))).await
}

pub async fn spawn_server_with(checker: Arc<dyn FormatChecker>) -> Result<TestServer> {
    let state = AppState::from_config(test_config())?.with_format_checker(checker);

    // Pick an unused port for isolation
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;

    let router = app(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    let server = TestServer {
        base_url: format!("http://127.0.0.1:{}", port),
        state,
        client: reqwest::Client::new(),
    };
    server.wait_ready(Duration::from_secs(5)).await?;
    Ok(server)
}
