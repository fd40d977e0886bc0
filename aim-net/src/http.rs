// aim-net/src/http.rs
use std::path::Path;
use std::sync::RwLock;
use std::time::Duration;

use aim_common::error::{AimError, Result};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, Method, RequestBuilder};
use tokio::fs::File as TokioFile;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error};

use crate::validation::proxy_address;

const DOWNLOAD_TIMEOUT_SECS: u64 = 300;
const CONNECT_TIMEOUT_SECS: u64 = 30;
const USER_AGENT_STRING: &str = "aim installation manager (Rust)";

/// HTTP capability used for repository metadata, account lookups and binary
/// downloads. Every failure surfaces as [`AimError::RepositoryUnavailable`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<String>;

    async fn get_with_token(&self, url: &str, token: &str) -> Result<String>;

    /// Performs an `OPTIONS` request, used for platform version probes.
    async fn option(&self, url: &str, token: &str) -> Result<String>;

    /// Streams the response body into `dest`, returning the number of bytes written.
    async fn download(&self, url: &str, token: Option<&str>, dest: &Path) -> Result<u64>;

    /// Routes later requests through the given proxy, or directly when `None`.
    fn configure_proxy(&self, _proxy_url: Option<&str>, _proxy_port: Option<&str>) -> Result<()> {
        Ok(())
    }
}

pub(crate) fn unavailable(url: &str, reason: impl std::fmt::Display) -> AimError {
    AimError::RepositoryUnavailable {
        url: url.to_string(),
        reason: reason.to_string(),
    }
}

#[derive(Debug)]
pub struct ReqwestTransport {
    client: RwLock<Client>,
}

impl ReqwestTransport {
    pub fn new(proxy_url: Option<&str>, proxy_port: Option<&str>) -> Result<Self> {
        Ok(Self {
            client: RwLock::new(build_http_client(proxy_url, proxy_port)?),
        })
    }

    fn client(&self) -> Client {
        self.client
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn request(&self, method: Method, url: &str, token: Option<&str>) -> RequestBuilder {
        let builder = self.client().request(method, url);
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, method: Method, url: &str, token: Option<&str>) -> Result<reqwest::Response> {
        let response = self
            .request(method, url, token)
            .send()
            .await
            .map_err(|e| {
                debug!("HTTP request failed for {url}: {e}");
                unavailable(url, e)
            })?;

        let status = response.status();
        debug!("Received HTTP status: {} for {}", status, url);
        if !status.is_success() {
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read response body".to_string());
            error!("HTTP error {} for URL {}: {}", status, url, body_text);
            return Err(unavailable(url, format!("HTTP error {status}: {body_text}")));
        }
        Ok(response)
    }

    async fn send_text(&self, method: Method, url: &str, token: Option<&str>) -> Result<String> {
        self.send(method, url, token)
            .await?
            .text()
            .await
            .map_err(|e| unavailable(url, format!("Failed to read response body: {e}")))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<String> {
        self.send_text(Method::GET, url, None).await
    }

    async fn get_with_token(&self, url: &str, token: &str) -> Result<String> {
        self.send_text(Method::GET, url, Some(token)).await
    }

    async fn option(&self, url: &str, token: &str) -> Result<String> {
        self.send_text(Method::OPTIONS, url, Some(token)).await
    }

    async fn download(&self, url: &str, token: Option<&str>, dest: &Path) -> Result<u64> {
        let response = self.send(Method::GET, url, token).await?;

        let mut file = TokioFile::create(dest).await?;
        let mut stream = response.bytes_stream();
        let mut written = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| unavailable(url, format!("Download interrupted: {e}")))?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;
        debug!(
            "Finished writing {} bytes from {} to {}",
            written,
            url,
            dest.display()
        );
        Ok(written)
    }

    fn configure_proxy(&self, proxy_url: Option<&str>, proxy_port: Option<&str>) -> Result<()> {
        let client = build_http_client(proxy_url, proxy_port)?;
        *self
            .client
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = client;
        Ok(())
    }
}

fn build_http_client(proxy_url: Option<&str>, proxy_port: Option<&str>) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_STRING));
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));

    let mut builder = Client::builder()
        .timeout(Duration::from_secs(DOWNLOAD_TIMEOUT_SECS))
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .default_headers(headers)
        .redirect(reqwest::redirect::Policy::limited(10));

    if let Some(proxy_url) = proxy_url {
        let address = proxy_address(proxy_url, proxy_port);
        debug!("Routing HTTP traffic through proxy {}", address);
        let proxy = reqwest::Proxy::all(&address)
            .map_err(|e| AimError::Config(format!("Invalid proxy '{address}': {e}")))?;
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| AimError::Config(format!("Failed to build HTTP client: {e}")))
}
