//! Classify raw cell values as plain text or a single anchor element.
//!
//! Detection is deliberately syntactic (an anchored, case-insensitive
//! pattern over the trimmed value) and isolated behind [`classify`] so it
//! could be swapped for a structural check without touching callers. A
//! value that passes the shape test but does not parse into exactly one
//! anchor falls back to plain text; a broken cell never fails its item.

use regex::Regex;
use scraper::{Html, Selector};
use std::sync::OnceLock;
use tracing::debug;

/// A classified cell value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    /// Ordinary text; used verbatim as the output value.
    Plain(String),
    /// The cell's entire content is one anchor element; the output value
    /// is the link text.
    Anchor { href: String, text: String },
}

/// Matches values whose entire trimmed form is a single anchor element.
fn anchor_shape() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)^<a[\s>].*</a>$").unwrap())
}

/// Strip the literal non-breaking-space escape sequence.
pub fn normalize(raw: &str) -> String {
    raw.replace("&nbsp;", "")
}

/// Classify a raw cell value.
pub fn classify(raw: &str) -> CellValue {
    let value = normalize(raw);
    let trimmed = value.trim();

    if !anchor_shape().is_match(trimmed) {
        return CellValue::Plain(value);
    }

    let fragment = Html::parse_fragment(trimmed);
    let sel = Selector::parse("a").unwrap();
    let anchors: Vec<_> = fragment.select(&sel).collect();
    if anchors.len() != 1 {
        debug!("anchor-shaped cell did not parse into one anchor, keeping raw value: {trimmed}");
        return CellValue::Plain(value);
    }

    let anchor = anchors[0];
    CellValue::Anchor {
        href: anchor.value().attr("href").unwrap_or("").to_string(),
        text: anchor.text().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_value_verbatim() {
        assert_eq!(classify("30000"), CellValue::Plain("30000".to_string()));
        assert_eq!(classify(""), CellValue::Plain(String::new()));
    }

    #[test]
    fn test_nbsp_stripped() {
        assert_eq!(classify("300&nbsp;km"), CellValue::Plain("300km".to_string()));
    }

    #[test]
    fn test_anchor_value_extracted() {
        assert_eq!(
            classify(r#"<a href="http://x/m.html">MANUAL</a>"#),
            CellValue::Anchor {
                href: "http://x/m.html".to_string(),
                text: "MANUAL".to_string(),
            }
        );
    }

    #[test]
    fn test_anchor_detection_is_case_insensitive() {
        assert_eq!(
            classify(r#"<A HREF="http://x/m.html">spec</A>"#),
            CellValue::Anchor {
                href: "http://x/m.html".to_string(),
                text: "spec".to_string(),
            }
        );
    }

    #[test]
    fn test_anchor_with_surrounding_whitespace() {
        assert_eq!(
            classify("  <a href=\"http://x\">t</a>\n"),
            CellValue::Anchor {
                href: "http://x".to_string(),
                text: "t".to_string(),
            }
        );
    }

    #[test]
    fn test_text_around_anchor_stays_plain() {
        // Not anchored at the start, so the shape test rejects it.
        let raw = r#"see <a href="http://x">docs</a>"#;
        assert_eq!(classify(raw), CellValue::Plain(raw.to_string()));
    }

    #[test]
    fn test_other_elements_stay_plain() {
        let raw = "<abbr title=\"automatic\">AT</abbr>";
        assert_eq!(classify(raw), CellValue::Plain(raw.to_string()));
    }

    #[test]
    fn test_two_anchors_fall_back_to_raw() {
        let raw = r#"<a href="http://x">a</a><a href="http://y">b</a>"#;
        assert_eq!(classify(raw), CellValue::Plain(raw.to_string()));
    }

    #[test]
    fn test_missing_href_yields_empty_href() {
        assert_eq!(
            classify("<a>orphan</a>"),
            CellValue::Anchor {
                href: String::new(),
                text: "orphan".to_string(),
            }
        );
    }
}
