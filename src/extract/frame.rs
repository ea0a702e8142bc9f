//! Resolve the embedded frame that hosts an item's data table.

use super::COMPONENT_DIV;
use scraper::{Html, Selector};

/// Embed provider the detail pages are expected to use. Frames from any
/// other origin are ignored.
pub const DEFAULT_TRUSTED_ORIGIN: &str = "https://wix-visual";

/// Locate the frame source URL inside a rendered detail page.
///
/// Selects iframes under root-level components and returns the first whose
/// `src` starts with `trusted_origin`. `None` means the item has no table,
/// a normal outcome the caller treats as "skip", not an error.
pub fn resolve_frame_source(html: &str, trusted_origin: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    let sel = Selector::parse(&format!("{COMPONENT_DIV} iframe")).unwrap();

    doc.select(&sel)
        .filter_map(|frame| frame.value().attr("src"))
        .find(|src| src.starts_with(trusted_origin))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_first_trusted_frame() {
        let html = r#"
            <div id="comp-x">
                <iframe src="https://ads.example/banner"></iframe>
                <iframe src="https://wix-visual-data.appspot.com/t/1"></iframe>
                <iframe src="https://wix-visual-data.appspot.com/t/2"></iframe>
            </div>
        "#;
        assert_eq!(
            resolve_frame_source(html, DEFAULT_TRUSTED_ORIGIN).as_deref(),
            Some("https://wix-visual-data.appspot.com/t/1")
        );
    }

    #[test]
    fn test_resolve_absent_when_no_qualifying_frame() {
        let html = r#"<div id="comp-x"><iframe src="https://ads.example/banner"></iframe></div>"#;
        assert_eq!(resolve_frame_source(html, DEFAULT_TRUSTED_ORIGIN), None);

        let html = r#"<div id="widget"><iframe src="https://wix-visual-data.appspot.com/t/1"></iframe></div>"#;
        assert_eq!(resolve_frame_source(html, DEFAULT_TRUSTED_ORIGIN), None);
    }
}
