use super::dom::DomNode;

/// Container hints, most specific first.
pub const CONTAINER_SELECTORS: [&str; 5] = [
    r#"[class*="card"]"#,
    r#"[class*="item"]"#,
    r#"[class*="company"]"#,
    "div",
    "li",
];

/// Widen a candidate anchor to the element that holds the whole directory entry.
///
/// Greedy: the first selector whose closest match carries more text than the
/// anchor wins, even if a later selector would find a better container.
/// Falls back to the anchor itself.
pub fn resolve<N: DomNode>(anchor: &N) -> N {
    let baseline = text_len(anchor);
    CONTAINER_SELECTORS
        .iter()
        .filter_map(|selector| anchor.closest(selector))
        .find(|container| text_len(container) > baseline)
        .unwrap_or_else(|| anchor.clone())
}

fn text_len<N: DomNode>(node: &N) -> usize {
    node.text_content().chars().count()
}
