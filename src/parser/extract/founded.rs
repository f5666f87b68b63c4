use std::sync::LazyLock;

use regex::Regex;

use crate::parser::dom::DomNode;

static IMG_TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<img\b[^>]*>").unwrap());
static YEAR_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(\d{4})\b").unwrap());

pub const EARLIEST_YEAR: i32 = 1940;

/// Founded year from the card markup, 0 when unknown.
pub fn extract<N: DomNode>(card: &N, current_year: i32) -> i32 {
    year_after_image(&card.outer_html(), current_year)
}

/// The directory renders the year right after the logo, so only year tokens
/// that follow the first `<img>` tag count. Years in prose before the logo
/// are ignored.
pub fn year_after_image(markup: &str, current_year: i32) -> i32 {
    let Some(img) = IMG_TAG_RE.find(markup) else {
        return 0;
    };
    YEAR_TOKEN_RE
        .captures_iter(&markup[img.end()..])
        .filter_map(|caps| caps[1].parse::<i32>().ok())
        .find(|year| (EARLIEST_YEAR..=current_year).contains(year))
        .unwrap_or(0)
}
