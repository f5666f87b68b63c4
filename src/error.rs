use thiserror::Error;

/// Page navigation failures. Any of these ends the run.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("navigation to {url} timed out after {timeout_ms}ms")]
    Timeout { url: String, timeout_ms: u64 },

    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("renderer failed for {url}: {message}")]
    Renderer { url: String, message: String },
}

/// Failure to build a record from one candidate. Skips that candidate only.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid website url {url:?}: {source}")]
    InvalidWebsite {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("website {0:?} has no host")]
    MissingHost(String),
}
