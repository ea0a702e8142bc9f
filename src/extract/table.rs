//! Parse the first HTML table of a rendered frame into column-major form.

use scraper::{Html, Selector};

/// A parsed table in column-major form.
///
/// `columns[c][0]` is column `c`'s header; `columns[c][1..]` are its data
/// cells in document order. All columns have equal length: rows shorter
/// than the widest row are padded with empty cells, never truncated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<Vec<String>>,
}

impl Table {
    /// Number of data rows (excluding the header row).
    pub fn row_count(&self) -> usize {
        self.columns
            .first()
            .map(|c| c.len().saturating_sub(1))
            .unwrap_or(0)
    }
}

/// Parse the first `<table>` element into column-major form.
///
/// Cells keep their inner HTML rather than flattened text, because anchor
/// cells are classified later from their raw markup. Returns `None` when
/// the document has no table element. Pure function of its input.
pub fn parse_table(html: &str) -> Option<Table> {
    let doc = Html::parse_document(html);
    let table_sel = Selector::parse("table").unwrap();
    let row_sel = Selector::parse("tr").unwrap();
    let cell_sel = Selector::parse("th, td").unwrap();

    let table = doc.select(&table_sel).next()?;

    let rows: Vec<Vec<String>> = table
        .select(&row_sel)
        .map(|tr| tr.select(&cell_sel).map(|cell| cell.inner_html()).collect())
        .collect();

    let width = rows.iter().map(|r| r.len()).max().unwrap_or(0);
    let mut columns: Vec<Vec<String>> = (0..width).map(|_| Vec::with_capacity(rows.len())).collect();
    for row in &rows {
        for (c, column) in columns.iter_mut().enumerate() {
            column.push(row.get(c).cloned().unwrap_or_default());
        }
    }

    Some(Table { columns })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_table() {
        let html = r#"
            <table>
                <tr><th>Model</th><th>Price</th></tr>
                <tr><td>X1</td><td>30000</td></tr>
            </table>
        "#;
        let table = parse_table(html).expect("table");
        assert_eq!(
            table.columns,
            vec![
                vec!["Model".to_string(), "X1".to_string()],
                vec!["Price".to_string(), "30000".to_string()],
            ]
        );
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn test_parse_table_pads_irregular_rows() {
        let html = r#"
            <table>
                <tr><td>A</td><td>B</td><td>C</td></tr>
                <tr><td>1</td></tr>
                <tr><td>2</td><td>3</td></tr>
            </table>
        "#;
        let table = parse_table(html).expect("table");
        assert_eq!(table.columns.len(), 3);
        assert_eq!(table.columns[0], vec!["A", "1", "2"]);
        assert_eq!(table.columns[1], vec!["B", "", "3"]);
        assert_eq!(table.columns[2], vec!["C", "", ""]);
    }

    #[test]
    fn test_parse_table_keeps_cell_markup() {
        let html = r#"
            <table>
                <tr><td>Docs</td></tr>
                <tr><td><a href="http://x/m.html">MANUAL</a></td></tr>
            </table>
        "#;
        let table = parse_table(html).expect("table");
        assert!(table.columns[0][1].contains(r#"<a href="http://x/m.html">"#));
    }

    #[test]
    fn test_parse_table_absent() {
        assert_eq!(parse_table("<div>no table here</div>"), None);
    }

    #[test]
    fn test_parse_table_only_first_table() {
        let html = "<table><tr><td>first</td></tr></table><table><tr><td>second</td></tr></table>";
        let table = parse_table(html).expect("table");
        assert_eq!(table.columns, vec![vec!["first".to_string()]]);
    }

    #[test]
    fn test_parse_table_idempotent() {
        let html = "<table><tr><th>H</th></tr><tr><td>v</td></tr></table>";
        assert_eq!(parse_table(html), parse_table(html));
    }
}
