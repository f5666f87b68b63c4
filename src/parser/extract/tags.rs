use std::sync::LazyLock;

use regex::Regex;

use crate::parser::classify::{classify_tag, TagKind};
use crate::parser::dom::DomNode;

static BRACKET_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([^\[\]]+)\]").unwrap());

/// Location and sector as found on the card; `None` means unresolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags {
    pub location: Option<String>,
    pub sector: Option<String>,
}

impl Tags {
    fn is_empty(&self) -> bool {
        self.location.is_none() && self.sector.is_none()
    }

    /// First classifier match decides the slot; a filled slot is never overwritten.
    fn absorb(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        match classify_tag(text) {
            Some(TagKind::Location) if self.location.is_none() => {
                self.location = Some(text.to_string())
            }
            Some(TagKind::Sector) if self.sector.is_none() => {
                self.sector = Some(text.to_string())
            }
            _ => {}
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagSource {
    PlaceholderAnchors,
    BracketTokens,
}

pub const TAG_CHAIN: [TagSource; 2] = [TagSource::PlaceholderAnchors, TagSource::BracketTokens];

pub fn extract<N: DomNode>(card: &N) -> Tags {
    TAG_CHAIN
        .iter()
        .map(|source| from_source(*source, card))
        .find(|tags| !tags.is_empty())
        .unwrap_or_default()
}

pub fn from_source<N: DomNode>(source: TagSource, card: &N) -> Tags {
    let mut tags = Tags::default();
    match source {
        TagSource::PlaceholderAnchors => {
            let texts: Vec<String> = card
                .select_all("a")
                .iter()
                .filter(|a| is_placeholder(a.attr_value("href").as_deref()))
                .map(|a| a.text_content())
                .collect();
            // Only the one- and two-chip layouts are trusted.
            if matches!(texts.len(), 1 | 2) {
                for text in &texts {
                    tags.absorb(text);
                }
            }
        }
        TagSource::BracketTokens => {
            let text = card.text_content();
            for caps in BRACKET_RE.captures_iter(&text) {
                tags.absorb(&caps[1]);
                if tags.location.is_some() && tags.sector.is_some() {
                    break;
                }
            }
        }
    }
    tags
}

/// Anchors that do not navigate anywhere: `#...`, empty, `javascript:`.
fn is_placeholder(href: Option<&str>) -> bool {
    match href.map(str::trim) {
        Some(h) => h.is_empty() || h.starts_with('#') || h.starts_with("javascript:"),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn tags(html: &str) -> Tags {
        let doc = Html::parse_fragment(html);
        let card = doc.root_element().select_first("div").unwrap();
        extract(&card)
    }

    #[test]
    fn two_placeholder_anchors() {
        let t = tags(r##"<div><a href="#">Singapore</a><a href="#">FinTech</a></div>"##);
        assert_eq!(t.location.as_deref(), Some("Singapore"));
        assert_eq!(t.sector.as_deref(), Some("FinTech"));
    }

    #[test]
    fn order_does_not_matter_for_distinct_kinds() {
        let t = tags(r##"<div><a href="#">HealthTech</a><a href="javascript:void(0)">Nairobi</a></div>"##);
        assert_eq!(t.location.as_deref(), Some("Nairobi"));
        assert_eq!(t.sector.as_deref(), Some("HealthTech"));
    }

    #[test]
    fn single_ambiguous_anchor_is_a_location() {
        let t = tags(r##"<div><a href="#">Dubai Tech</a></div>"##);
        assert_eq!(t.location.as_deref(), Some("Dubai Tech"));
        assert_eq!(t.sector, None);
    }

    #[test]
    fn two_locations_keep_the_first() {
        let t = tags(r##"<div><a href="#">London</a><a href="#">Berlin</a></div>"##);
        assert_eq!(t.location.as_deref(), Some("London"));
        assert_eq!(t.sector, None);
    }

    #[test]
    fn bracket_tokens_when_no_anchors() {
        let t = tags(r#"<div><p>Acme [Oslo] [climate software] [extra]</p></div>"#);
        assert_eq!(t.location.as_deref(), Some("Oslo"));
        assert_eq!(t.sector.as_deref(), Some("climate software"));
    }

    #[test]
    fn three_anchors_fall_back_to_brackets() {
        let t = tags(
            r##"<div><a href="#">a</a><a href="#">b</a><a href="#">c</a><span>[Lagos]</span></div>"##,
        );
        assert_eq!(t.location.as_deref(), Some("Lagos"));
    }

    #[test]
    fn real_links_are_not_placeholders() {
        let t = tags(r##"<div><a href="https://acme.io">Singapore</a></div>"##);
        assert_eq!(t, Tags::default());
    }

    #[test]
    fn nothing_to_find() {
        assert_eq!(tags("<div><p>just prose here</p></div>"), Tags::default());
    }
}
