//! Tabular export sink.
//!
//! The pipeline treats export purely as a data sink: create a named unit
//! per item, set its columns, fill values column-wise, attach header
//! annotations, and write everything once at the end of the run. The
//! trait keeps the workbook format out of the core; tests substitute a
//! recording sink.

pub mod xlsx;

use crate::error::HarvestError;
use std::path::Path;

/// Handle to one output unit (worksheet) within a sink.
pub type UnitId = usize;

/// Column header plus its positional key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub header: String,
    pub key: usize,
}

/// Append-only tabular data sink. Row 0 is the header row.
pub trait TableSink: Send {
    /// Create a new named output unit and return its handle.
    fn create_unit(&mut self, name: &str) -> Result<UnitId, HarvestError>;
    /// Declare the unit's columns.
    fn set_columns(&mut self, unit: UnitId, columns: &[ColumnSpec]) -> Result<(), HarvestError>;
    /// Fill one column's data values (rows 1..).
    fn set_column_values(
        &mut self,
        unit: UnitId,
        column: usize,
        values: &[String],
    ) -> Result<(), HarvestError>;
    /// Attach an annotation to a cell. `row` 0 addresses the header row.
    fn set_cell_annotation(
        &mut self,
        unit: UnitId,
        row: u32,
        column: usize,
        text: &str,
    ) -> Result<(), HarvestError>;
    /// Write all units to `path`.
    fn write(&mut self, path: &Path) -> Result<(), HarvestError>;
}
