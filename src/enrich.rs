//! Cell enrichment: resolve anchor cells to their link text and attach
//! annotation text for `MANUAL` links.
//!
//! A `MANUAL` link points at a page whose component text is the item's
//! manual. Each distinct href is fetched at most once per run: the
//! [`ManualCache`] is a write-once set owned by the run context, so only
//! the first occurrence of a repeated href gets an annotation attached,
//! and later occurrences keep the plain label. First-occurrence-wins is
//! deliberate, documented behavior, not an accident.

use crate::error::HarvestError;
use crate::extract;
use crate::extract::cell::{classify, normalize, CellValue};
use crate::extract::table::Table;
use crate::fetch::{fetch_rendered, RenderOptions};
use crate::renderer::Renderer;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, warn};

/// Link label that marks a cell as pointing at an annotation source.
pub const MANUAL_SENTINEL: &str = "MANUAL";

/// Hrefs whose annotation source has already been fetched this run.
/// Write-once, no eviction, process lifetime.
pub type ManualCache = HashSet<String>;

/// Annotation text destined for a column's header cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// Column the annotation belongs to.
    pub column: usize,
    /// Plain text fetched from the annotation source.
    pub text: String,
}

/// Enriches the data cells of parsed tables.
pub struct Enricher<'a> {
    renderer: &'a dyn Renderer,
    render: &'a RenderOptions,
    manual_dir: Option<&'a Path>,
}

impl<'a> Enricher<'a> {
    pub fn new(renderer: &'a dyn Renderer, render: &'a RenderOptions) -> Self {
        Self {
            renderer,
            render,
            manual_dir: None,
        }
    }

    /// Also dump each fetched annotation text to a file named after the
    /// item under `dir`.
    pub fn with_manual_dir(mut self, dir: Option<&'a Path>) -> Self {
        self.manual_dir = dir;
        self
    }

    /// Enrich a table's data cells.
    ///
    /// Returns the output values per column and the annotations gathered
    /// for header cells. Enrichment replaces values in place, so the
    /// output has the table's data dimensions. Annotation fetch failures
    /// are logged and swallowed: annotation is enrichment, not a required
    /// field.
    pub async fn enrich_table(
        &self,
        item_name: &str,
        table: &Table,
        cache: &mut ManualCache,
    ) -> (Vec<Vec<String>>, Vec<Annotation>) {
        let mut values = Vec::with_capacity(table.columns.len());
        let mut annotations = Vec::new();

        for (column, cells) in table.columns.iter().enumerate() {
            let mut out = Vec::with_capacity(cells.len().saturating_sub(1));
            for raw in cells.iter().skip(1) {
                match classify(raw) {
                    CellValue::Plain(value) => out.push(value),
                    CellValue::Anchor { href, text } => {
                        if text == MANUAL_SENTINEL {
                            if let Some(note) = self.fetch_manual(item_name, &href, cache).await {
                                annotations.push(Annotation { column, text: note });
                            }
                        }
                        out.push(text);
                    }
                }
            }
            values.push(out);
        }

        (values, annotations)
    }

    /// Fetch the annotation text behind a `MANUAL` href, at most once per
    /// run per href.
    async fn fetch_manual(
        &self,
        item_name: &str,
        href: &str,
        cache: &mut ManualCache,
    ) -> Option<String> {
        if href.is_empty() {
            debug!("MANUAL cell without href in {item_name}, skipping");
            return None;
        }
        if !cache.insert(href.to_string()) {
            debug!("manual {href} already fetched this run");
            return None;
        }

        info!("fetching manual for {item_name} from {href}");
        let doc = match fetch_rendered(self.renderer, href, self.render).await {
            Ok(doc) => doc,
            Err(e) => {
                warn!("manual fetch failed for {item_name}: {e:#}");
                return None;
            }
        };

        let Some(text) = extract::component_text(&doc.html) else {
            warn!("manual page {href} has no component text");
            return None;
        };

        if let Some(dir) = self.manual_dir {
            if let Err(e) = dump_manual_text(dir, item_name, &text) {
                warn!("failed to dump manual text for {item_name}: {e:#}");
            }
        }

        Some(text)
    }
}

/// Normalize a table's header row: headers are not classified, only
/// cosmetically cleaned.
pub fn headers(table: &Table) -> Vec<String> {
    table
        .columns
        .iter()
        .map(|c| normalize(c.first().map(String::as_str).unwrap_or("")))
        .collect()
}

fn dump_manual_text(dir: &Path, item_name: &str, text: &str) -> Result<(), HarvestError> {
    std::fs::create_dir_all(dir).map_err(|e| HarvestError::Io {
        path: dir.to_path_buf(),
        source: e,
    })?;
    // Item names are free text; keep them filesystem-safe.
    let file_name: String = item_name
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | '\0') { '_' } else { c })
        .collect();
    let path = dir.join(file_name);
    std::fs::write(&path, text).map_err(|e| HarvestError::Io { path, source: e })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::RenderContext;
    use async_trait::async_trait;

    /// Renderer that fails the test if any fetch is attempted.
    struct NoFetchRenderer;

    #[async_trait]
    impl Renderer for NoFetchRenderer {
        async fn new_context(&self) -> anyhow::Result<Box<dyn RenderContext>> {
            panic!("no fetch expected for this table");
        }
        async fn shutdown(&self) -> anyhow::Result<()> {
            Ok(())
        }
        fn active_contexts(&self) -> usize {
            0
        }
    }

    fn table(columns: Vec<Vec<&str>>) -> Table {
        Table {
            columns: columns
                .into_iter()
                .map(|c| c.into_iter().map(str::to_string).collect())
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_enrich_preserves_dimensions_without_manual_cells() {
        let table = table(vec![
            vec!["Model", "X1", "X2"],
            vec!["Specs", r#"<a href="http://x/s.html">Spec sheet</a>"#, "n/a"],
        ]);
        let render = RenderOptions::default();
        let enricher = Enricher::new(&NoFetchRenderer, &render);
        let mut cache = ManualCache::new();

        let (values, annotations) = enricher.enrich_table("X", &table, &mut cache).await;

        // Non-MANUAL anchors resolve to their text without any fetch.
        assert_eq!(values, vec![vec!["X1", "X2"], vec!["Spec sheet", "n/a"]]);
        assert!(annotations.is_empty());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_headers_are_normalized_not_classified() {
        let table = table(vec![
            vec!["Model&nbsp;", "X1"],
            vec![r#"<a href="u">Docs</a>"#, "v"],
        ]);
        assert_eq!(headers(&table), vec!["Model", r#"<a href="u">Docs</a>"#]);
    }
}
