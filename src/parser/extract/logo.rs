use crate::parser::dom::DomNode;

/// Absolute URL of the card's first image, or empty.
pub fn extract<N: DomNode>(card: &N, origin: &str) -> String {
    card.select_first("img")
        .and_then(|img| img.attr_value("src"))
        .map(|src| absolutize(&src, origin))
        .unwrap_or_default()
}

pub fn absolutize(src: &str, origin: &str) -> String {
    let src = src.trim();
    if src.is_empty() || src.starts_with("data:") {
        String::new()
    } else if src.starts_with("https://") || src.starts_with("http://") {
        src.to_string()
    } else if let Some(rest) = src.strip_prefix("//") {
        format!("https://{}", rest)
    } else if src.starts_with('/') {
        format!("{}{}", origin.trim_end_matches('/'), src)
    } else {
        format!("https://{}", src)
    }
}
