use url::Url;

use crate::parser::dom::{collapse_whitespace, DomNode};

const MIN_NAME_LEN: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameSource {
    Heading,
    ClassHint,
    BoldText,
    ImageAlt,
    WebsiteHost,
}

/// Tried in order; the first valid name wins.
pub const NAME_CHAIN: [NameSource; 5] = [
    NameSource::Heading,
    NameSource::ClassHint,
    NameSource::BoldText,
    NameSource::ImageAlt,
    NameSource::WebsiteHost,
];

pub fn extract<N: DomNode>(card: &N, website: &Url) -> Option<String> {
    NAME_CHAIN
        .iter()
        .find_map(|source| from_source(*source, card, website))
}

pub fn from_source<N: DomNode>(source: NameSource, card: &N, website: &Url) -> Option<String> {
    match source {
        NameSource::Heading => first_valid_text(card, "h1, h2, h3, h4, h5, h6"),
        NameSource::ClassHint => first_valid_text(
            card,
            r#"[class*="name"], [class*="title"], [class*="company"]"#,
        ),
        NameSource::BoldText => first_valid_text(card, "strong, b"),
        NameSource::ImageAlt => card
            .select_all("img[alt]")
            .iter()
            .filter_map(|img| img.attr_value("alt"))
            .find_map(|alt| valid_name(&alt)),
        NameSource::WebsiteHost => name_from_host(website),
    }
}

fn first_valid_text<N: DomNode>(card: &N, selector: &str) -> Option<String> {
    card.select_all(selector)
        .iter()
        .find_map(|el| valid_name(&el.text_content()))
}

fn valid_name(raw: &str) -> Option<String> {
    let name = collapse_whitespace(raw);
    (name.chars().count() >= MIN_NAME_LEN).then_some(name)
}

/// `https://www.acme-labs.io/about` -> `Acme-labs`
fn name_from_host(website: &Url) -> Option<String> {
    let host = website.host_str()?;
    let label = host.trim_start_matches("www.").split('.').next()?;
    let mut chars = label.chars();
    let first = chars.next()?;
    valid_name(&format!("{}{}", first.to_uppercase(), chars.as_str()))
}
