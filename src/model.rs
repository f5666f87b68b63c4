use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const UNKNOWN: &str = "Unknown";

/// One directory entry. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRecord {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub website: String,
    pub description: String,
    /// 0 when unknown.
    pub founded_year: i32,
    pub location: String,
    pub sector: String,
    pub logo_url: String,
    pub portfolio_url: String,
    pub api_url: String,
}

impl CompanyRecord {
    /// Website with casing and trailing slashes normalized away.
    pub fn website_key(&self) -> String {
        self.website.trim_end_matches('/').to_lowercase()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Running,
    Done,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionProgress {
    pub processed_count: usize,
    pub current_page: u32,
    pub errors: Vec<String>,
    pub status: RunStatus,
    pub started_at: DateTime<Utc>,
}

impl ExtractionProgress {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            processed_count: 0,
            current_page: 0,
            errors: Vec::new(),
            status: RunStatus::Running,
            started_at,
        }
    }
}
