#![allow(dead_code)]

use anyhow::{Context, Result};
use tokio::task::JoinHandle;

use cashcards::config::AppConfig;
use cashcards::{app, AppState};

pub const SARAH: (&str, &str) = ("sarah1", "abc123");
pub const KUMAR: (&str, &str) = ("kumar2", "xyz789");
pub const HANK: (&str, &str) = ("hank-owns-no-cards", "qrs456");

/// In-process server with its own freshly seeded memory store
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    client: reqwest::Client,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with(AppConfig::development()).await
    }

    pub async fn spawn_with(config: AppConfig) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let state = AppState::from_config(config).await?;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .with_context(|| format!("failed to bind {}", base_url))?;

        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app(state)).await;
        });

        Ok(Self {
            port,
            base_url,
            client: reqwest::Client::new(),
            handle,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn get(&self, path: &str, (user, pass): (&str, &str)) -> reqwest::RequestBuilder {
        self.client.get(self.url(path)).basic_auth(user, Some(pass))
    }

    pub fn get_url(&self, url: &str, (user, pass): (&str, &str)) -> reqwest::RequestBuilder {
        self.client.get(url).basic_auth(user, Some(pass))
    }

    pub fn post(&self, path: &str, (user, pass): (&str, &str)) -> reqwest::RequestBuilder {
        self.client.post(self.url(path)).basic_auth(user, Some(pass))
    }

    pub fn put(&self, path: &str, (user, pass): (&str, &str)) -> reqwest::RequestBuilder {
        self.client.put(self.url(path)).basic_auth(user, Some(pass))
    }

    pub fn anonymous(&self) -> &reqwest::Client {
        &self.client
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Pull the `amount` field out of every element of a JSON array
pub fn amounts(body: &serde_json::Value) -> Vec<f64> {
    body.as_array()
        .map(|cards| cards.iter().filter_map(|c| c["amount"].as_f64()).collect())
        .unwrap_or_default()
}

pub fn ids(body: &serde_json::Value) -> Vec<i64> {
    body.as_array()
        .map(|cards| cards.iter().filter_map(|c| c["id"].as_i64()).collect())
        .unwrap_or_default()
}
