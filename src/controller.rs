use std::collections::HashSet;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{Datelike, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::fetcher::PageFetcher;
use crate::model::{CompanyRecord, ExtractionProgress, RunStatus};
use crate::parser::{self, ExtractContext};
use crate::store::{self, BlobStore};

/// Everything a run accumulates. Owned by the controller and threaded through
/// each pagination step.
#[derive(Debug, Clone)]
pub struct RunState {
    pub companies: Vec<CompanyRecord>,
    pub progress: ExtractionProgress,
    seen_slugs: HashSet<String>,
    seen_websites: HashSet<String>,
}

impl RunState {
    pub fn new(progress: ExtractionProgress) -> Self {
        Self {
            companies: Vec::new(),
            progress,
            seen_slugs: HashSet::new(),
            seen_websites: HashSet::new(),
        }
    }

    /// Append unless the slug or normalized website is already known.
    fn insert(&mut self, record: CompanyRecord) -> bool {
        let website = record.website_key();
        if self.seen_slugs.contains(&record.slug) || self.seen_websites.contains(&website) {
            return false;
        }
        self.seen_slugs.insert(record.slug.clone());
        self.seen_websites.insert(website);
        self.companies.push(record);
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    EmptyPage,
    NoNewCompanies,
    MaxPages,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    Continue { added: usize },
    Done(StopReason),
}

/// Fold one page of records into the run.
pub fn merge_page(
    mut state: RunState,
    page: u32,
    records: Vec<CompanyRecord>,
    max_pages: u32,
) -> (RunState, PageOutcome) {
    if records.is_empty() {
        return (state, PageOutcome::Done(StopReason::EmptyPage));
    }

    let found = records.len();
    let mut added = 0;
    for record in records {
        if state.insert(record) {
            added += 1;
        }
    }
    info!("Page {}: {} companies found, {} new", page, found, added);

    if added == 0 {
        return (state, PageOutcome::Done(StopReason::NoNewCompanies));
    }
    state.progress.processed_count += added;

    if page >= max_pages {
        return (state, PageOutcome::Done(StopReason::MaxPages));
    }
    (state, PageOutcome::Continue { added })
}

/// Fetch one page, wait for it to settle, extract records.
async fn scrape_page<F: PageFetcher>(
    config: &Config,
    fetcher: &F,
    ctx: &ExtractContext,
    page: u32,
) -> Result<Vec<CompanyRecord>> {
    if page > 1 && config.delay_ms > 0 {
        tokio::time::sleep(config.delay()).await;
    }

    let url = config.page_url(page)?;
    let html = fetcher.fetch(&url, config.timeout()).await?;

    let wait = fetcher.wait_for_content(&config.content_selector);
    if tokio::time::timeout(config.content_timeout(), wait).await.is_err() {
        warn!(
            "Content not ready on page {} after {}ms, extracting anyway",
            page, config.content_timeout_ms
        );
    }

    Ok(parser::extract_page(&html, ctx))
}

/// Drive the page loop until the directory runs dry, the ceiling is hit, or a
/// page fails. Page failures end the run but are reported through
/// `progress.errors`; only persistence failures surface as `Err`.
pub async fn run<F: PageFetcher, S: BlobStore>(
    config: &Config,
    fetcher: &F,
    store: &S,
) -> Result<RunState> {
    let ctx = ExtractContext::new(&config.base_url, Utc::now().year())
        .with_context(|| format!("Invalid base url {:?}", config.base_url))?;
    if config.retry_attempts > 0 {
        info!(
            "retryAttempts={} is configured but failed pages are not retried",
            config.retry_attempts
        );
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(120));

    let mut state = RunState::new(ExtractionProgress::new(Utc::now()));
    let mut page = 1;

    let reason = loop {
        state.progress.current_page = page;
        pb.set_message(format!("page {} | {} companies", page, state.companies.len()));

        let records = match scrape_page(config, fetcher, &ctx, page).await {
            Ok(records) => records,
            Err(e) => {
                error!("Page {} failed: {:#}", page, e);
                state.progress.errors.push(format!("page {}: {:#}", page, e));
                state.progress.status = RunStatus::Error;
                pb.finish_and_clear();
                store::save_snapshot(store, &state.companies, &state.progress)?;
                return Ok(state);
            }
        };

        let (next, outcome) = merge_page(state, page, records, config.max_pages);
        state = next;
        match outcome {
            PageOutcome::Continue { added } => {
                pb.println(format!("page {}: +{} companies", page, added));
                store::save_snapshot(store, &state.companies, &state.progress)?;
                page += 1;
            }
            PageOutcome::Done(reason) => break reason,
        }
    };
    pb.finish_and_clear();

    info!(
        "Stopped at page {} ({:?}): {} companies",
        page,
        reason,
        state.companies.len()
    );
    state.progress.status = RunStatus::Done;
    store::save_snapshot(store, &state.companies, &state.progress)?;
    store::save_final(store, &state.companies)?;
    Ok(state)
}

// ── Tests ──
