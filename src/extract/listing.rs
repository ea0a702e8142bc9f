//! Extract listing entries from the rendered root page.

use super::COMPONENT_DIV;
use scraper::{Html, Selector};
use url::Url;

/// One entry on the listing page: a labeled link to a detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingItem {
    /// Accessible label of the listing anchor; the item's display name.
    pub name: String,
    /// Absolute URL of the item's detail page.
    pub detail_url: String,
}

/// Extract listing items from the rendered root page.
///
/// Selects anchors under root-level components, keeping only those with a
/// non-empty `aria-label` (anchors without one are decoration, not listing
/// entries) and an `href`. Relative hrefs are absolutized against
/// `base_url`. Document order; zero matches is an empty vec, not an error.
pub fn extract_listing(html: &str, base_url: &str) -> Vec<ListingItem> {
    let doc = Html::parse_document(html);
    let sel = Selector::parse(&format!("{COMPONENT_DIV} a")).unwrap();
    let base = Url::parse(base_url).ok();

    doc.select(&sel)
        .filter_map(|a| {
            let name = a.value().attr("aria-label")?.to_string();
            if name.is_empty() {
                return None;
            }
            let href = a.value().attr("href")?;
            Some(ListingItem {
                name,
                detail_url: absolutize(href, base.as_ref()),
            })
        })
        .collect()
}

fn absolutize(href: &str, base: Option<&Url>) -> String {
    match base {
        Some(base) => base
            .join(href)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| href.to_string()),
        None => href.to_string(),
    }
}
