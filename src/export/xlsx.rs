//! Xlsx sink over `rust_xlsxwriter`.
//!
//! Units buffer in memory and the workbook is built and saved in one shot
//! by [`XlsxSink::write`], so the run leaves no partial file behind if it
//! is terminated midway.

use super::{ColumnSpec, TableSink, UnitId};
use crate::error::HarvestError;
use rust_xlsxwriter::{Note, Workbook};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::info;

/// Worksheet name limit imposed by the xlsx format.
const MAX_SHEET_NAME: usize = 31;

#[derive(Debug, Default)]
struct UnitBuf {
    name: String,
    columns: Vec<ColumnSpec>,
    values: HashMap<usize, Vec<String>>,
    notes: HashMap<(u32, usize), String>,
}

/// Buffered xlsx workbook writer.
#[derive(Debug, Default)]
pub struct XlsxSink {
    units: Vec<UnitBuf>,
    used_names: HashSet<String>,
}

impl XlsxSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn unit_mut(&mut self, unit: UnitId) -> Result<&mut UnitBuf, HarvestError> {
        self.units.get_mut(unit).ok_or(HarvestError::UnknownUnit(unit))
    }

    /// Map a free-text item name onto a legal, unique worksheet name.
    fn sheet_name(&mut self, name: &str) -> String {
        let cleaned: String = name
            .trim()
            .chars()
            .map(|c| {
                if matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\') {
                    ' '
                } else {
                    c
                }
            })
            .collect();
        let mut base: String = cleaned.trim().chars().take(MAX_SHEET_NAME).collect();
        base.truncate(base.trim_end().len());
        if base.is_empty() {
            base = "Sheet".to_string();
        }

        let mut candidate = base.clone();
        let mut n = 2;
        while self.used_names.contains(&candidate) {
            let suffix = format!(" ({n})");
            let keep = MAX_SHEET_NAME.saturating_sub(suffix.chars().count());
            candidate = base.chars().take(keep).collect::<String>() + &suffix;
            n += 1;
        }
        self.used_names.insert(candidate.clone());
        candidate
    }
}

impl TableSink for XlsxSink {
    fn create_unit(&mut self, name: &str) -> Result<UnitId, HarvestError> {
        let name = self.sheet_name(name);
        self.units.push(UnitBuf {
            name,
            ..UnitBuf::default()
        });
        Ok(self.units.len() - 1)
    }

    fn set_columns(&mut self, unit: UnitId, columns: &[ColumnSpec]) -> Result<(), HarvestError> {
        self.unit_mut(unit)?.columns = columns.to_vec();
        Ok(())
    }

    fn set_column_values(
        &mut self,
        unit: UnitId,
        column: usize,
        values: &[String],
    ) -> Result<(), HarvestError> {
        self.unit_mut(unit)?.values.insert(column, values.to_vec());
        Ok(())
    }

    fn set_cell_annotation(
        &mut self,
        unit: UnitId,
        row: u32,
        column: usize,
        text: &str,
    ) -> Result<(), HarvestError> {
        // Last write wins, matching spreadsheet note semantics.
        self.unit_mut(unit)?
            .notes
            .insert((row, column), text.to_string());
        Ok(())
    }

    fn write(&mut self, path: &Path) -> Result<(), HarvestError> {
        let mut workbook = Workbook::new();

        for unit in &self.units {
            let sheet = workbook.add_worksheet();
            sheet.set_name(&unit.name)?;

            for spec in &unit.columns {
                sheet.write_string(0, spec.key as u16, spec.header.as_str())?;
            }
            for (&column, values) in &unit.values {
                for (row, value) in values.iter().enumerate() {
                    sheet.write_string(row as u32 + 1, column as u16, value.as_str())?;
                }
            }
            for ((row, column), text) in &unit.notes {
                let note = Note::new(text.as_str());
                sheet.insert_note(*row, *column as u16, &note)?;
            }
        }

        workbook.save(path)?;
        info!("wrote {} unit(s) to {}", self.units.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_name_sanitized_and_truncated() {
        let mut sink = XlsxSink::new();
        assert_eq!(sink.sheet_name("A/B: the [best]?"), "A B  the  best");
        let long = "x".repeat(40);
        assert_eq!(sink.sheet_name(&long).chars().count(), MAX_SHEET_NAME);
        assert_eq!(sink.sheet_name("  "), "Sheet");
    }

    #[test]
    fn test_sheet_name_deduplicated() {
        let mut sink = XlsxSink::new();
        assert_eq!(sink.sheet_name("Alpha"), "Alpha");
        assert_eq!(sink.sheet_name("Alpha"), "Alpha (2)");
        assert_eq!(sink.sheet_name("Alpha"), "Alpha (3)");
    }

    #[test]
    fn test_write_workbook() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.xlsx");

        let mut sink = XlsxSink::new();
        let unit = sink.create_unit("Alpha").unwrap();
        sink.set_columns(
            unit,
            &[
                ColumnSpec {
                    header: "Model".to_string(),
                    key: 0,
                },
                ColumnSpec {
                    header: "Price".to_string(),
                    key: 1,
                },
            ],
        )
        .unwrap();
        sink.set_column_values(unit, 0, &["X1".to_string()]).unwrap();
        sink.set_column_values(unit, 1, &["30000".to_string()]).unwrap();
        sink.set_cell_annotation(unit, 0, 1, "list price").unwrap();
        sink.write(&path).expect("write failed");

        assert!(path.exists());
    }

    #[test]
    fn test_unknown_unit_rejected() {
        let mut sink = XlsxSink::new();
        assert!(matches!(
            sink.set_column_values(7, 0, &[]),
            Err(HarvestError::UnknownUnit(7))
        ));
    }
}
