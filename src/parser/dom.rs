use scraper::{ElementRef, Selector};
use tracing::debug;

/// Query capability over a parsed HTML tree.
///
/// Card resolution and the field extractors only talk to this trait, so they
/// work against any tree that can answer these questions. `select_all` follows
/// `querySelectorAll` semantics (descendants only), while `closest` considers
/// the node itself before walking up its ancestors.
pub trait DomNode: Sized + Clone {
    /// Descendants matching `selector`, in document order.
    fn select_all(&self, selector: &str) -> Vec<Self>;

    /// Nearest ancestor-or-self matching `selector`.
    fn closest(&self, selector: &str) -> Option<Self>;

    /// All descendant text, whitespace-collapsed and trimmed.
    fn text_content(&self) -> String;

    /// Individual descendant text nodes, trimmed, empties skipped.
    fn text_nodes(&self) -> Vec<String>;

    /// Attribute value, owned.
    fn attr_value(&self, name: &str) -> Option<String>;

    /// Raw outer markup.
    fn outer_html(&self) -> String;

    fn select_first(&self, selector: &str) -> Option<Self> {
        self.select_all(selector).into_iter().next()
    }

    /// Lowercased `class` attribute, empty when absent.
    fn class_hint(&self) -> String {
        self.attr_value("class").unwrap_or_default().to_lowercase()
    }
}

fn parse_selector(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(s) => Some(s),
        Err(e) => {
            debug!("Invalid selector {:?}: {}", selector, e);
            None
        }
    }
}

/// Collapse runs of whitespace to single spaces.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl<'a> DomNode for ElementRef<'a> {
    fn select_all(&self, selector: &str) -> Vec<Self> {
        let Some(sel) = parse_selector(selector) else {
            return Vec::new();
        };
        ElementRef::select(self, &sel)
            .filter(|el| el.id() != self.id())
            .collect()
    }

    fn closest(&self, selector: &str) -> Option<Self> {
        let sel = parse_selector(selector)?;
        std::iter::once(*self)
            .chain(self.ancestors().filter_map(ElementRef::wrap))
            .find(|el| sel.matches(el))
    }

    fn text_content(&self) -> String {
        collapse_whitespace(&self.text().collect::<Vec<_>>().join(" "))
    }

    fn text_nodes(&self) -> Vec<String> {
        self.text()
            .map(collapse_whitespace)
            .filter(|t| !t.is_empty())
            .collect()
    }

    fn attr_value(&self, name: &str) -> Option<String> {
        self.value().attr(name).map(str::to_string)
    }

    fn outer_html(&self) -> String {
        ElementRef::html(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    const HTML: &str = r#"
        <div class="card" id="outer">
          <div class="inner">
            <h3>  Acme
                Corp </h3>
            <a href="https://acme.io">Visit</a>
          </div>
        </div>"#;

    #[test]
    fn select_all_excludes_self() {
        let doc = Html::parse_fragment(HTML);
        let card = doc.root_element().select_first("div.card").unwrap();
        assert!(card.select_all("div.card").is_empty());
        assert_eq!(card.select_all("div").len(), 1);
    }

    #[test]
    fn closest_includes_self_then_ancestors() {
        let doc = Html::parse_fragment(HTML);
        let anchor = doc.root_element().select_first("a").unwrap();
        assert_eq!(anchor.closest("a").unwrap().attr_value("href").as_deref(), Some("https://acme.io"));
        let card = anchor.closest(r#"[class*="card"]"#).unwrap();
        assert_eq!(card.attr_value("id").as_deref(), Some("outer"));
        assert!(anchor.closest("li").is_none());
    }

    #[test]
    fn attr_value_is_owned_on_concrete_nodes() {
        let doc = Html::parse_fragment(HTML);
        let anchor = doc.root_element().select_first("a").unwrap();
        let href: Option<String> = anchor.attr_value("href");
        assert_eq!(href, Some("https://acme.io".to_string()));
        assert_eq!(anchor.attr_value("rel"), None);
        assert_eq!(anchor.class_hint(), "");
    }

    #[test]
    fn text_is_collapsed() {
        let doc = Html::parse_fragment(HTML);
        let card = doc.root_element().select_first("div.card").unwrap();
        assert_eq!(card.text_content(), "Acme Corp Visit");
        assert_eq!(card.text_nodes(), vec!["Acme Corp", "Visit"]);
    }

    #[test]
    fn invalid_selector_matches_nothing() {
        let doc = Html::parse_fragment(HTML);
        assert!(doc.root_element().select_all("[[[").is_empty());
        assert!(doc.root_element().closest("[[[").is_none());
    }
}
