//! Parse rendered HTML into listing entries, frame sources, tables, and
//! classified cell values.
//!
//! All functions here are pure over their input string: parsing happens
//! eagerly and returns owned data, so no DOM handle ever crosses an await
//! point in the async pipeline.

pub mod cell;
pub mod frame;
pub mod listing;
pub mod table;

use scraper::{Html, Selector};

/// Root-level component containers on the target sites are `<div>`s whose
/// id carries this structural prefix. Listing anchors, embed frames, and
/// annotation text all live under them.
pub(crate) const COMPONENT_DIV: &str = r#"div[id^="comp-"]"#;

/// Plain text content of the first root-level component container.
///
/// Used for annotation pages, whose whole payload is the text of the
/// page's component tree. `None` when no container exists or it is empty.
pub fn component_text(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    let sel = Selector::parse(COMPONENT_DIV).unwrap();
    let container = doc.select(&sel).next()?;
    let text: String = container.text().collect();
    let text = text.trim().to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
