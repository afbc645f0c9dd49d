//! Test helpers for integration tests
//!
//! Provides utilities for spawning test servers, making HTTP requests
//! and reading server-sent events.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::pin::Pin;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::body::Bytes;
use futures_util::{Stream, StreamExt};
use reqwest::{multipart, Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use spark_api::{create_app, create_app_state};
use spark_common::AppConfig;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Optional Postgres URL; tests use the in-memory store without it
pub const TEST_DATABASE_URL_VAR: &str = "SPARK_TEST_DATABASE_URL";

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    pub upload_dir: PathBuf,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server
    pub async fn start() -> Result<Self> {
        Self::start_with_config(test_config()).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let upload_dir = config.storage.upload_dir.clone();
        let state = create_app_state(config).await?;
        let app = create_app(state)?;

        // Port 0 lets the OS pick a free port
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            upload_dir,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    /// Make a POST request with JSON body
    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        Ok(self.client.post(self.url(path)).json(body).send().await?)
    }

    /// Make a PATCH request with JSON body
    pub async fn patch<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        Ok(self.client.patch(self.url(path)).json(body).send().await?)
    }

    /// Make a DELETE request
    pub async fn delete(&self, path: &str) -> Result<Response> {
        Ok(self.client.delete(self.url(path)).send().await?)
    }

    /// Upload a file as the `img` field of a multipart PUT
    pub async fn put_file(
        &self,
        path: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<Response> {
        let part = multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = multipart::Form::new().part("img", part);
        Ok(self.client.put(self.url(path)).multipart(form).send().await?)
    }

    /// Open a user's event stream
    ///
    /// Uses a client without a total timeout since the response never completes.
    pub async fn open_stream(&self, user_id: &str, since: Option<&str>) -> Result<EventReader> {
        let mut path = format!("/api/v1/users/{user_id}/stream");
        if let Some(since) = since {
            path.push_str(&format!("?since={since}"));
        }

        let response = Client::new()
            .get(self.url(&path))
            .header("accept", "text/event-stream")
            .send()
            .await?;
        assert_status_ref(&response, StatusCode::OK)?;
        Ok(EventReader::new(response))
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        std::fs::remove_dir_all(&self.upload_dir).ok();
    }
}

/// Create a test configuration
///
/// Each server gets its own upload directory and a rate limit tests cannot hit.
pub fn test_config() -> AppConfig {
    dotenvy::dotenv().ok();

    let mut config = AppConfig::default();
    if let Ok(url) = std::env::var(TEST_DATABASE_URL_VAR) {
        config.database.url = url;
    }
    config.storage.upload_dir =
        std::env::temp_dir().join(format!("spark-it-{}", uuid::Uuid::new_v4()));
    config.rate_limit.requests_per_second = 10_000;
    config.rate_limit.burst = 10_000;
    config.delivery.keep_alive_secs = 1;
    config
}

type ByteStream = Pin<Box<dyn Stream<Item = reqwest::Result<Bytes>> + Send>>;

/// Splits an SSE body into `data:` payloads, skipping keep-alive comments
pub struct EventReader {
    body: ByteStream,
    buffer: String,
}

impl EventReader {
    fn new(response: Response) -> Self {
        Self {
            body: Box::pin(response.bytes_stream()),
            buffer: String::new(),
        }
    }

    /// Next event payload, or `None` once the server closed the stream
    pub async fn next_event(&mut self) -> Result<Option<Value>> {
        loop {
            if let Some(end) = self.buffer.find("\n\n") {
                let frame: String = self.buffer.drain(..end + 2).collect();
                let data: Vec<&str> = frame
                    .lines()
                    .filter_map(|line| line.strip_prefix("data:"))
                    .map(str::trim_start)
                    .collect();
                if data.is_empty() {
                    continue;
                }
                return Ok(Some(serde_json::from_str(&data.join("\n"))?));
            }

            match self.body.next().await {
                Some(chunk) => self.buffer.push_str(std::str::from_utf8(&chunk?)?),
                None => return Ok(None),
            }
        }
    }

    /// Next event, failing after `wait`
    pub async fn expect_event(&mut self, wait: Duration) -> Result<Value> {
        tokio::time::timeout(wait, self.next_event())
            .await
            .context("timed out waiting for event")??
            .context("stream ended")
    }

    /// True when nothing but keep-alives arrives within `wait`
    pub async fn is_quiet(&mut self, wait: Duration) -> bool {
        tokio::time::timeout(wait, self.next_event()).await.is_err()
    }
}

fn assert_status_ref(response: &Response, expected_status: StatusCode) -> Result<()> {
    if response.status() != expected_status {
        anyhow::bail!("Expected status {}, got {}", expected_status, response.status());
    }
    Ok(())
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(response: Response, expected_status: StatusCode) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(())
}

/// Assert an error response and return its `error.code`
pub async fn assert_error(response: Response, expected_status: StatusCode) -> Result<String> {
    let body: Value = assert_json(response, expected_status).await?;
    body["error"]["code"]
        .as_str()
        .map(str::to_string)
        .context("error body without code")
}
