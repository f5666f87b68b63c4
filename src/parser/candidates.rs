use std::collections::HashSet;

use url::Url;

use super::dom::DomNode;

const SECURE_ANCHOR: &str = r#"a[href^="https://"]"#;
const PORTFOLIO_CONTAINER: &str = r#"[class*="portfolio"]"#;
/// Anything this short cannot be a real company site.
const MIN_HREF_LEN: usize = 10;

/// Social, media and self-referential hosts. Subdomains are denied too.
const DENIED_DOMAINS: &[&str] = &[
    "antler.co",
    "linkedin.com",
    "twitter.com",
    "x.com",
    "facebook.com",
    "instagram.com",
    "youtube.com",
    "youtu.be",
    "tiktok.com",
    "medium.com",
    "github.com",
    "crunchbase.com",
    "glassdoor.com",
    "spotify.com",
    "apple.com",
    "google.com",
    "webflow.io",
    "webflow.com",
];

/// Anchors on the page that plausibly point at a company's own website.
pub fn discover<N: DomNode>(root: &N) -> Vec<N> {
    let anchors = portfolio_anchors(root).unwrap_or_else(|| root.select_all(SECURE_ANCHOR));

    let mut seen = HashSet::new();
    anchors
        .into_iter()
        .filter_map(|a| {
            let href = a.attr_value("href")?;
            if !is_company_href(&href) || !seen.insert(href) {
                return None;
            }
            Some(a)
        })
        .collect()
}

/// Anchors inside every portfolio container, in document order.
///
/// `None` unless at least one of them is a company link, so a header holding
/// only self-links does not hide the rest of the page.
fn portfolio_anchors<N: DomNode>(root: &N) -> Option<Vec<N>> {
    let anchors: Vec<N> = root
        .select_all(SECURE_ANCHOR)
        .into_iter()
        .filter(|a| a.closest(PORTFOLIO_CONTAINER).is_some())
        .collect();

    let has_company = anchors.iter().any(|a| {
        a.attr_value("href")
            .is_some_and(|href| is_company_href(&href))
    });
    has_company.then_some(anchors)
}

pub fn is_company_href(href: &str) -> bool {
    if href.len() <= MIN_HREF_LEN || href.starts_with("mailto:") || href.starts_with("tel:") {
        return false;
    }
    match host_of(href) {
        Some(host) => !is_denied_host(&host),
        None => false,
    }
}

fn host_of(href: &str) -> Option<String> {
    Url::parse(href)
        .ok()?
        .host_str()
        .map(|h| h.trim_start_matches("www.").to_lowercase())
}

fn is_denied_host(host: &str) -> bool {
    DENIED_DOMAINS
        .iter()
        .any(|d| host == *d || host.ends_with(&format!(".{}", d)))
}
