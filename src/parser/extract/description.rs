use std::sync::LazyLock;

use regex::Regex;

use crate::parser::dom::DomNode;

static BARE_YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4}$").unwrap());

const MIN_DESCRIPTION_LEN: usize = 5;
/// Bounds for the loose text-node scan, both exclusive.
const TEXT_NODE_MIN: usize = 20;
const TEXT_NODE_MAX: usize = 300;

/// Paragraphs carrying one of these class hints are tag chips, not prose.
const EXCLUDED_HINTS: &[&str] = &["tag", "badge", "year", "location", "sector"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptionSource {
    FirstParagraph,
    ClassHint,
    NestedParagraph,
    TextNode,
}

pub const DESCRIPTION_CHAIN: [DescriptionSource; 4] = [
    DescriptionSource::FirstParagraph,
    DescriptionSource::ClassHint,
    DescriptionSource::NestedParagraph,
    DescriptionSource::TextNode,
];

pub fn synthesized(name: &str) -> String {
    format!("{} is a portfolio company of Antler.", name)
}

/// Never empty: falls back to a sentence built from `name`.
pub fn extract<N: DomNode>(card: &N, name: &str) -> String {
    DESCRIPTION_CHAIN
        .iter()
        .find_map(|source| from_source(*source, card))
        .unwrap_or_else(|| synthesized(name))
}

pub fn from_source<N: DomNode>(source: DescriptionSource, card: &N) -> Option<String> {
    match source {
        DescriptionSource::FirstParagraph => card
            .select_first("p")
            .filter(|p| !is_excluded(p))
            .and_then(|p| long_enough(p.text_content())),
        DescriptionSource::ClassHint => card
            .select_all(r#"[class*="description"], [class*="summary"], [class*="intro"]"#)
            .iter()
            .find_map(|el| long_enough(el.text_content())),
        DescriptionSource::NestedParagraph => card
            .select_all("p")
            .iter()
            .filter(|p| !is_excluded(*p))
            .find_map(|p| long_enough(p.text_content())),
        DescriptionSource::TextNode => card
            .text_nodes()
            .into_iter()
            .find(|t| is_prose_text(t)),
    }
}

fn is_excluded<N: DomNode>(el: &N) -> bool {
    let class = el.class_hint();
    EXCLUDED_HINTS.iter().any(|hint| class.contains(hint))
}

fn long_enough(text: String) -> Option<String> {
    (text.chars().count() >= MIN_DESCRIPTION_LEN).then_some(text)
}

fn is_prose_text(text: &str) -> bool {
    let len = text.chars().count();
    len > TEXT_NODE_MIN
        && len < TEXT_NODE_MAX
        && !text.contains("http://")
        && !text.contains("https://")
        && !text.contains("www.")
        && !BARE_YEAR_RE.is_match(text)
}
