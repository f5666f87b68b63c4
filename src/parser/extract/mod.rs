pub mod description;
pub mod founded;
pub mod logo;
pub mod name;
pub mod tags;

use url::Url;

use super::dom::DomNode;
use super::ExtractContext;

/// Everything inferred from one card, before defaults are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardFields {
    pub name: String,
    pub description: String,
    pub location: Option<String>,
    pub sector: Option<String>,
    pub logo_url: String,
    pub founded_year: i32,
}

/// Run every field extractor over `card`. `None` when no usable name exists.
pub fn extract_all<N: DomNode>(card: &N, website: &Url, ctx: &ExtractContext) -> Option<CardFields> {
    let name = name::extract(card, website)?;
    let description = description::extract(card, &name);
    let tags = tags::extract(card);
    let logo_url = logo::extract(card, &ctx.origin);
    let founded_year = founded::extract(card, ctx.current_year);

    Some(CardFields {
        name,
        description,
        location: tags.location,
        sector: tags.sector,
        logo_url,
        founded_year,
    })
}

// ── Tests ──
