pub mod candidates;
pub mod card;
pub mod classify;
pub mod dom;
pub mod extract;
pub mod record;

use scraper::Html;
use tracing::{debug, warn};
use url::Url;

use crate::model::CompanyRecord;
use dom::DomNode;

/// Site-level facts the extractors need.
#[derive(Debug, Clone)]
pub struct ExtractContext {
    /// `scheme://host`, used to absolutize root-relative image paths.
    pub origin: String,
    /// Directory root with query and fragment stripped; record pages hang off it.
    pub portfolio_base: Url,
    pub current_year: i32,
}

impl ExtractContext {
    pub fn new(base_url: &str, current_year: i32) -> Result<Self, url::ParseError> {
        let base = Url::parse(base_url)?;
        let mut portfolio_base = base.clone();
        portfolio_base.set_query(None);
        portfolio_base.set_fragment(None);
        Ok(Self {
            origin: base.origin().ascii_serialization(),
            portfolio_base,
            current_year,
        })
    }

    /// `https://www.antler.co/portfolio?sort=az` + `acme` -> `https://www.antler.co/portfolio/acme`
    pub fn portfolio_url(&self, slug: &str) -> String {
        let mut url = self.portfolio_base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(slug);
        }
        url.to_string()
    }
}

/// Candidate discovery -> card resolution -> record build, for one rendered page.
///
/// A candidate that fails is logged and skipped; the page always yields
/// whatever records could be built.
pub fn extract_page(html: &str, ctx: &ExtractContext) -> Vec<CompanyRecord> {
    let document = Html::parse_document(html);
    let root = document.root_element();
    let candidates = candidates::discover(&root);
    debug!("{} candidate links on page", candidates.len());

    let mut records = Vec::with_capacity(candidates.len());
    for anchor in &candidates {
        match record::build(anchor, ctx) {
            Ok(Some(record)) => records.push(record),
            Ok(None) => {}
            Err(e) => warn!(
                "Skipping candidate {}: {}",
                anchor.attr_value("href").unwrap_or_default(),
                e
            ),
        }
    }
    records
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> ExtractContext {
        ExtractContext::new("https://www.antler.co/portfolio", 2026).unwrap()
    }

    fn fixture(name: &str) -> String {
        std::fs::read_to_string(format!("tests/fixtures/{}.html", name)).unwrap()
    }

    #[test]
    fn context_from_base_url() {
        let c = ExtractContext::new("https://www.antler.co/portfolio/", 2026).unwrap();
        assert_eq!(c.origin, "https://www.antler.co");
        assert_eq!(c.portfolio_url("acme"), "https://www.antler.co/portfolio/acme");
        assert!(ExtractContext::new("not a url", 2026).is_err());
    }

    #[test]
    fn portfolio_url_drops_query_and_fragment() {
        let c = ExtractContext::new("https://www.antler.co/portfolio?sort=az#grid", 2026).unwrap();
        assert_eq!(c.portfolio_url("nimbus"), "https://www.antler.co/portfolio/nimbus");

        let bare = ExtractContext::new("https://www.antler.co", 2026).unwrap();
        assert_eq!(bare.portfolio_url("nimbus"), "https://www.antler.co/nimbus");
    }

    #[test]
    fn records_from_query_base_keep_a_clean_portfolio_url() {
        let c = ExtractContext::new("https://www.antler.co/portfolio?sort=az", 2026).unwrap();
        let records = extract_page(&fixture("portfolio_page"), &c);
        assert_eq!(records[3].portfolio_url, "https://www.antler.co/portfolio/nimbus");
    }

    #[test]
    fn portfolio_page_fixture() {
        let records = extract_page(&fixture("portfolio_page"), &ctx());
        let slugs: Vec<&str> = records.iter().map(|r| r.slug.as_str()).collect();
        assert_eq!(slugs, vec!["kopi-labs", "carbonlens", "medibridge", "nimbus"]);

        let kopi = &records[0];
        assert_eq!(kopi.website, "https://kopilabs.sg");
        assert_eq!(kopi.location, "Singapore");
        assert_eq!(kopi.sector, "FinTech");
        assert_eq!(kopi.founded_year, 2021);
        assert_eq!(kopi.logo_url, "https://www.antler.co/images/kopi.png");
        assert_eq!(kopi.description, "Embedded lending for coffee shop chains across Southeast Asia.");

        let carbon = &records[1];
        assert_eq!(carbon.name, "CarbonLens");
        assert_eq!(carbon.location, "Oslo");
        assert_eq!(carbon.sector, "Climate");
        assert_eq!(carbon.founded_year, 2022);
        assert_eq!(carbon.logo_url, "https://cdn.example.com/carbonlens.svg");

        let medi = &records[2];
        assert_eq!(medi.name, "MediBridge");
        assert_eq!(medi.location, "Nairobi");
        assert_eq!(medi.sector, "HealthTech");
        assert_eq!(medi.founded_year, 0);

        let nimbus = &records[3];
        assert_eq!(nimbus.name, "Nimbus");
        assert_eq!(nimbus.description, "Nimbus is a portfolio company of Antler.");
        assert_eq!(nimbus.location, "Unknown");
        assert_eq!(nimbus.sector, "Unknown");
    }

    #[test]
    fn empty_page_fixture() {
        assert!(extract_page(&fixture("empty_page"), &ctx()).is_empty());
    }

    #[test]
    fn garbage_html_does_not_panic() {
        assert!(extract_page("<<<>>> <a href=", &ctx()).is_empty());
        assert!(extract_page("", &ctx()).is_empty());
    }
}
