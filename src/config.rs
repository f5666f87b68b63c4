use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use url::Url;

/// Run configuration. Every key is optional in the JSON file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Directory root; page 1 is fetched from here verbatim.
    pub base_url: String,
    /// Inclusive page ceiling.
    pub max_pages: u32,
    /// Fixed pause before every page after the first.
    #[serde(alias = "delay")]
    pub delay_ms: u64,
    /// Accepted for compatibility; navigation is never retried.
    pub retry_attempts: u32,
    pub output_dir: PathBuf,
    /// Query parameter carrying the page number.
    pub page_param: String,
    pub timeout_ms: u64,
    pub content_timeout_ms: u64,
    /// Selector whose presence means the directory has rendered.
    pub content_selector: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "https://www.antler.co/portfolio".to_string(),
            max_pages: 50,
            delay_ms: 2000,
            retry_attempts: 3,
            output_dir: PathBuf::from("data/antler"),
            page_param: "page".to_string(),
            timeout_ms: 30_000,
            content_timeout_ms: 10_000,
            content_selector: r#"a[href^="https://"]"#.to_string(),
        }
    }
}

impl Config {
    /// Defaults, overlaid with the JSON file at `path` when given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let body = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }

    pub fn page_url(&self, page: u32) -> Result<String> {
        let mut url = Url::parse(&self.base_url)
            .with_context(|| format!("Invalid base url {:?}", self.base_url))?;
        if page > 1 {
            url.query_pairs_mut()
                .append_pair(&self.page_param, &page.to_string());
        }
        Ok(url.to_string())
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn content_timeout(&self) -> Duration {
        Duration::from_millis(self.content_timeout_ms)
    }
}
