use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use super::card;
use super::dom::DomNode;
use super::extract;
use super::ExtractContext;
use crate::error::ExtractError;
use crate::model::{CompanyRecord, UNKNOWN};

static NON_ALNUM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

const MIN_WEBSITE_LEN: usize = 10;
const ID_PREFIX: &str = "antler";

/// `"Acme Corp!"` -> `"acme-corp"`
pub fn slugify(name: &str) -> String {
    NON_ALNUM_RE
        .replace_all(&name.to_lowercase(), "-")
        .trim_matches('-')
        .to_string()
}

/// Build a record for one candidate anchor.
///
/// `Ok(None)` is an ordinary heuristic miss (no usable website or name) and is
/// not worth logging; `Err` means the candidate itself was malformed.
pub fn build<N: DomNode>(
    anchor: &N,
    ctx: &ExtractContext,
) -> Result<Option<CompanyRecord>, ExtractError> {
    let website = anchor
        .attr_value("href")
        .map(|h| h.trim().to_string())
        .unwrap_or_default();
    if website.len() <= MIN_WEBSITE_LEN {
        return Ok(None);
    }

    let url = Url::parse(&website).map_err(|source| ExtractError::InvalidWebsite {
        url: website.clone(),
        source,
    })?;
    if url.host_str().is_none() {
        return Err(ExtractError::MissingHost(website));
    }

    let card = card::resolve(anchor);
    let Some(fields) = extract::extract_all(&card, &url, ctx) else {
        return Ok(None);
    };

    let slug = slugify(&fields.name);
    if slug.is_empty() {
        return Ok(None);
    }

    Ok(Some(CompanyRecord {
        id: format!("{}-{}", ID_PREFIX, slug),
        portfolio_url: ctx.portfolio_url(&slug),
        api_url: format!("/api/companies/{}", slug),
        name: fields.name,
        slug,
        website,
        description: fields.description,
        founded_year: fields.founded_year,
        location: fields.location.unwrap_or_else(|| UNKNOWN.to_string()),
        sector: fields.sector.unwrap_or_else(|| UNKNOWN.to_string()),
        logo_url: fields.logo_url,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn ctx() -> ExtractContext {
        ExtractContext::new("https://www.antler.co/portfolio/", 2026).unwrap()
    }

    fn build_first(html: &str) -> Result<Option<CompanyRecord>, ExtractError> {
        let doc = Html::parse_document(html);
        let anchor = doc.root_element().select_first("a").unwrap();
        build(&anchor, &ctx())
    }

    #[test]
    fn slug_examples() {
        assert_eq!(slugify("Acme Corp!"), "acme-corp");
        assert_eq!(slugify("  --Hello,   World--  "), "hello-world");
        assert_eq!(slugify("Q2 Metrics (Beta)"), "q2-metrics-beta");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn slug_is_deterministic() {
        let names = ["Nimbus", "Acme Corp!", "Zeta.ai", "Über Co"];
        for n in names {
            assert_eq!(slugify(n), slugify(n));
        }
    }

    #[test]
    fn builds_full_record() {
        let html = r##"
            <div class="company-card">
              <img src="//cdn.antler.co/acme.png"><span>2020</span>
              <h3>Acme Corp!</h3>
              <p>Acme builds payment rails.</p>
              <a href="#">Jakarta</a><a href="#">Payments Infrastructure</a>
              <a href="https://acme.io/">Website</a>
            </div>"##;
        let doc = Html::parse_document(html);
        let anchor = doc.root_element().select_first(r#"a[href^="https"]"#).unwrap();
        let record = build(&anchor, &ctx()).unwrap().unwrap();

        assert_eq!(record.id, "antler-acme-corp");
        assert_eq!(record.slug, "acme-corp");
        assert_eq!(record.name, "Acme Corp!");
        assert_eq!(record.website, "https://acme.io/");
        assert_eq!(record.location, "Jakarta");
        assert_eq!(record.sector, "Payments Infrastructure");
        assert_eq!(record.founded_year, 2020);
        assert_eq!(record.logo_url, "https://cdn.antler.co/acme.png");
        assert_eq!(record.portfolio_url, "https://www.antler.co/portfolio/acme-corp");
        assert_eq!(record.api_url, "/api/companies/acme-corp");
    }

    #[test]
    fn unresolved_fields_default_to_unknown() {
        let record = build_first(r#"<li><h3>Nimbus</h3><a href="https://nimbus.io">Go</a></li>"#)
            .unwrap()
            .unwrap();
        assert_eq!(record.location, "Unknown");
        assert_eq!(record.sector, "Unknown");
        assert_eq!(record.founded_year, 0);
        assert_eq!(record.description, "Nimbus is a portfolio company of Antler.");
    }

    #[test]
    fn short_website_is_a_silent_miss() {
        assert!(build_first(r#"<div><h3>Acme</h3><a href="https://a">x</a></div>"#)
            .unwrap()
            .is_none());
        assert!(build_first(r#"<div><h3>Acme</h3><a>x</a></div>"#).unwrap().is_none());
    }

    #[test]
    fn malformed_website_is_an_error() {
        let err = build_first(r#"<div><h3>Acme</h3><a href="https://exa mple.com">x</a></div>"#)
            .unwrap_err();
        assert!(matches!(err, ExtractError::InvalidWebsite { .. }));
    }
}
