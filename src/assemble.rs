//! Assemble one named output record per item and push it through the sink.

use crate::enrich::{self, Annotation};
use crate::error::HarvestError;
use crate::export::{ColumnSpec, TableSink};
use crate::extract::listing::ListingItem;
use crate::extract::table::Table;

/// One output column: header plus enriched data values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputColumn {
    pub header: String,
    pub values: Vec<String>,
}

/// The normalized per-item result: one output unit, written exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRecord {
    /// Unit name, from the listing item's label.
    pub name: String,
    pub columns: Vec<OutputColumn>,
    /// Annotations attached to header cells, keyed by column.
    pub annotations: Vec<Annotation>,
}

/// Build an item's output record from its parsed table and enrichment
/// results.
///
/// Headers come from row 0 of each parsed column, data values from the
/// enriched remainder. Enrichment replaced values in place, so the record
/// has exactly the table's dimensions.
pub fn assemble(
    item: &ListingItem,
    table: &Table,
    values: Vec<Vec<String>>,
    annotations: Vec<Annotation>,
) -> OutputRecord {
    debug_assert_eq!(values.len(), table.columns.len());

    let columns = enrich::headers(table)
        .into_iter()
        .zip(values)
        .map(|(header, values)| OutputColumn { header, values })
        .collect();

    OutputRecord {
        name: item.name.clone(),
        columns,
        annotations,
    }
}

/// Write a record into the sink as one new output unit.
pub fn write_record(sink: &mut dyn TableSink, record: &OutputRecord) -> Result<(), HarvestError> {
    let unit = sink.create_unit(&record.name)?;

    let specs: Vec<ColumnSpec> = record
        .columns
        .iter()
        .enumerate()
        .map(|(key, column)| ColumnSpec {
            header: column.header.clone(),
            key,
        })
        .collect();
    sink.set_columns(unit, &specs)?;

    for (key, column) in record.columns.iter().enumerate() {
        sink.set_column_values(unit, key, &column.values)?;
    }
    for annotation in &record.annotations {
        sink.set_cell_annotation(unit, 0, annotation.column, &annotation.text)?;
    }

    Ok(())
}
