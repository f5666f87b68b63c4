use std::sync::LazyLock;

use regex::Regex;

static TITLE_CASE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][A-Za-z0-9]*(?: [A-Z][A-Za-z0-9]*)*$").unwrap());

const PLACES: &[&str] = &[
    // Asia Pacific
    "singapore", "jakarta", "indonesia", "vietnam", "ho chi minh", "hanoi",
    "malaysia", "kuala lumpur", "philippines", "manila", "thailand", "bangkok",
    "india", "bangalore", "bengaluru", "mumbai", "delhi", "korea", "seoul",
    "japan", "tokyo", "hong kong", "taiwan", "china", "australia", "sydney",
    "melbourne", "new zealand", "auckland",
    // Europe
    "london", "united kingdom", "england", "berlin", "munich", "germany",
    "amsterdam", "netherlands", "stockholm", "sweden", "oslo", "norway",
    "copenhagen", "denmark", "helsinki", "finland", "nordics", "lisbon",
    "portugal", "madrid", "spain", "paris", "france", "zurich", "switzerland",
    "europe",
    // Americas
    "new york", "nyc", "austin", "san francisco", "los angeles", "miami",
    "boston", "united states", "america", "toronto", "canada", "brazil",
    "sao paulo", "são paulo", "mexico", "colombia", "latam",
    // Middle East & Africa
    "dubai", "abu dhabi", "riyadh", "saudi arabia", "qatar", "nairobi", "kenya",
    "lagos", "nigeria", "cape town", "south africa", "egypt", "africa",
    // Codes
    "uk", "us", "usa", "uae", "sg", "ksa", "mena", "sea", "apac", "emea",
];

const SECTORS: &[&str] = &[
    "fintech", "healthtech", "healthcare", "medtech", "biotech", "edtech",
    "proptech", "insurtech", "legaltech", "regtech", "agritech", "agtech",
    "foodtech", "cleantech", "climate", "deep tech", "deeptech", "saas", "b2b",
    "b2c", "marketplace", "e-commerce", "ecommerce", "logistics", "mobility",
    "ai", "artificial intelligence", "machine learning", "cybersecurity",
    "blockchain", "web3", "crypto", "gaming", "media", "hr", "real estate",
    "construction", "energy", "retail", "consumer", "enterprise", "analytics",
    "iot", "hardware", "robotics", "travel", "hospitality", "manufacturing",
    "supply chain", "insurance", "education", "sustainability",
    "developer tools", "future of work",
];

const GENERIC_INDUSTRY_TOKENS: &[&str] = &["tech", "software", "service", "platform"];

fn words(lower: &str) -> Vec<&str> {
    lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect()
}

/// Terms match on whole words only: "us" must not fire inside "business",
/// nor "paris" inside "comparison". Multi-word terms match as a run of words.
fn contains_term(text_words: &[&str], term: &str) -> bool {
    let term_words = words(term);
    !term_words.is_empty()
        && text_words
            .windows(term_words.len())
            .any(|window| window == term_words.as_slice())
}

fn contains_any(text: &str, terms: &[&str]) -> bool {
    let lower = text.to_lowercase();
    let w = words(&lower);
    terms.iter().any(|t| contains_term(&w, t))
}

/// Does the text mention a known place?
pub fn is_location_text(text: &str) -> bool {
    contains_any(text, PLACES)
}

/// Does the text look like an industry/sector label?
///
/// Deliberately broad: any Title Case phrase qualifies, so place names pass
/// too. Callers must check [`is_location_text`] first.
pub fn is_sector_text(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return false;
    }
    if contains_any(trimmed, SECTORS) {
        return true;
    }
    let lower = trimmed.to_lowercase();
    if GENERIC_INDUSTRY_TOKENS.iter().any(|t| lower.contains(t)) {
        return true;
    }
    TITLE_CASE_RE.is_match(trimmed)
}

/// Which categorical field a piece of tag text belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Location,
    Sector,
}

/// Location first, then sector.
pub fn classify_tag(text: &str) -> Option<TagKind> {
    if is_location_text(text) {
        Some(TagKind::Location)
    } else if is_sector_text(text) {
        Some(TagKind::Sector)
    } else {
        None
    }
}
