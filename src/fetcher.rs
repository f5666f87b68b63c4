use std::future::Future;
use std::time::{Duration, Instant};

use anyhow::Result;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use spider_client::shapes::request::{ReturnFormat, ReturnFormatHandling};
use spider_client::{RequestParams, Spider};
use tracing::debug;

use crate::error::FetchError;

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Turns a URL into page HTML.
pub trait PageFetcher {
    fn fetch(&self, url: &str, timeout: Duration) -> impl Future<Output = Result<String, FetchError>>;

    /// Resolves once content matching `selector` is present on the last fetched
    /// page. Callers bound this with a timeout. Static fetchers hand back
    /// finished HTML, so there is nothing to wait for.
    fn wait_for_content(&self, _selector: &str) -> impl Future<Output = ()> {
        async {}
    }
}

// ── Plain HTTP ──

/// Static HTML over reqwest. No JavaScript rendering.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<String, FetchError> {
        let start = Instant::now();
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| network_error(url, timeout, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| network_error(url, timeout, e))?;
        debug!("Fetched {} ({} bytes) in {}ms", url, body.len(), start.elapsed().as_millis());
        Ok(body)
    }
}

fn network_error(url: &str, timeout: Duration, source: reqwest::Error) -> FetchError {
    if source.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
            timeout_ms: timeout.as_millis() as u64,
        }
    } else {
        FetchError::Network {
            url: url.to_string(),
            source,
        }
    }
}

// ── spider.cloud ──

/// Browser-rendered HTML via spider.cloud, for directories that build their
/// listing client-side.
pub struct SpiderFetcher {
    spider: Spider,
}

impl SpiderFetcher {
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("SPIDER_API_KEY")
            .map_err(|_| anyhow::anyhow!("SPIDER_API_KEY environment variable must be set"))?;
        let spider = Spider::new(Some(api_key))
            .map_err(|e| anyhow::anyhow!("Failed to create Spider client: {}", e))?;
        Ok(Self { spider })
    }
}

impl PageFetcher for SpiderFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<String, FetchError> {
        let params = RequestParams {
            return_format: Some(ReturnFormatHandling::Single(ReturnFormat::Raw)),
            ..Default::default()
        };

        let start = Instant::now();
        let response = tokio::time::timeout(
            timeout,
            self.spider.scrape_url(url, Some(params), "application/json"),
        )
        .await
        .map_err(|_| FetchError::Timeout {
            url: url.to_string(),
            timeout_ms: timeout.as_millis() as u64,
        })?
        .map_err(|e| FetchError::Renderer {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let html = first_content(response).ok_or_else(|| FetchError::Renderer {
            url: url.to_string(),
            message: "no content in spider response".to_string(),
        })?;
        debug!("Rendered {} ({} bytes) in {}ms", url, html.len(), start.elapsed().as_millis());
        Ok(html)
    }
}

/// Spider answers with `[{ "content": ..., "status": ... }]`, sometimes JSON-encoded
/// inside a string.
fn first_content(response: serde_json::Value) -> Option<String> {
    let parsed: serde_json::Value = match response.as_str() {
        Some(s) => serde_json::from_str(s).unwrap_or(response.clone()),
        None => response,
    };

    parsed
        .as_array()
        .and_then(|arr| arr.first())
        .and_then(|obj| obj.get("content"))
        .and_then(|c| c.as_str())
        .map(str::to_string)
}
