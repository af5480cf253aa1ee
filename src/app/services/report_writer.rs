//! Workbook emission for the finished table collection.
//!
//! Layout within a sheet: tables are stacked top to bottom. Each table
//! occupies one header row (title in column 0, column headers from column
//! 1) plus one row per row header, followed by a single blank separator
//! row. Absent cells are simply not written. Every value passes through
//! [`CellValue::coerce`] so numerics land as native numbers in the
//! workbook.
//!
//! The layout logic writes through the [`SheetSink`] trait; the xlsx
//! binding is one adapter over `rust_xlsxwriter`, which keeps the layout
//! testable without reading workbook files back.

use rust_xlsxwriter::{Workbook, Worksheet};
use std::path::Path;
use tracing::{debug, info};

use crate::app::models::{CellValue, Table};
use crate::app::services::collector::DataCollector;
use crate::{Error, Result};

/// One addressable output region accepting positioned cell writes.
pub trait SheetSink {
    fn write(&mut self, row: u32, col: u16, value: &CellValue) -> Result<()>;
}

impl SheetSink for Worksheet {
    fn write(&mut self, row: u32, col: u16, value: &CellValue) -> Result<()> {
        let result = match value {
            // generic write keeps i64 values exact past f64's 2^53 range
            CellValue::Int(i) => Worksheet::write(self, row, col, *i),
            CellValue::Float(f) => self.write_number(row, col, *f),
            CellValue::Text(s) => self.write_string(row, col, s),
        };
        result
            .map(|_| ())
            .map_err(|e| Error::spreadsheet_write(format!("cell ({row}, {col})"), e))
    }
}

/// Write one group's tables into a sink, stacked with blank separator
/// rows, returning the number of grid rows consumed.
pub fn write_tables(tables: &[Table], sink: &mut dyn SheetSink) -> Result<u32> {
    let mut cursor: u32 = 0;
    for table in tables {
        sink.write(cursor, 0, &CellValue::coerce(table.title()))?;
        for (c, col) in table.col_headers().iter().enumerate() {
            sink.write(cursor, 1 + c as u16, &CellValue::coerce(col))?;
        }
        for (r, row) in table.row_headers().iter().enumerate() {
            let grid_row = cursor + 1 + r as u32;
            sink.write(grid_row, 0, &CellValue::coerce(row))?;
            for (c, col) in table.col_headers().iter().enumerate() {
                if let Some(value) = table.cell(row, col) {
                    sink.write(grid_row, 1 + c as u16, &CellValue::coerce(value))?;
                }
            }
        }
        // header row + data rows + one blank separator row
        cursor += 2 + table.row_headers().len() as u32;
    }
    Ok(cursor)
}

/// Serialize the whole collection into an xlsx workbook at `path`.
///
/// One named worksheet per output group when a sheet dimension is
/// configured, a single default-named worksheet otherwise.
pub fn write_workbook(collector: &DataCollector, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();

    if collector.has_sheet_dimension() {
        for group in collector.named_groups() {
            let sheet = workbook.add_worksheet();
            sheet.set_name(&group.name).map_err(|e| {
                Error::spreadsheet_write(format!("worksheet name '{}'", group.name), e)
            })?;
            let rows = write_tables(&group.tables, sheet)?;
            debug!(
                "Worksheet '{}': {} tables, {} grid rows",
                group.name,
                group.tables.len(),
                rows
            );
        }
        // Data points seen before the first sheet-dimension match land in
        // the default group; they still get a default-named worksheet.
        if !collector.default_tables().is_empty() {
            let sheet = workbook.add_worksheet();
            let rows = write_tables(collector.default_tables(), sheet)?;
            debug!(
                "Default worksheet: {} tables, {} grid rows",
                collector.default_tables().len(),
                rows
            );
        }
    } else {
        let sheet = workbook.add_worksheet();
        let rows = write_tables(collector.default_tables(), sheet)?;
        debug!(
            "Default worksheet: {} tables, {} grid rows",
            collector.default_tables().len(),
            rows
        );
    }

    workbook
        .save(path)
        .map_err(|e| Error::spreadsheet_write(format!("saving '{}'", path.display()), e))?;

    info!(
        "Wrote {} table(s) across {} sheet(s) to {}",
        collector.table_count(),
        collector.sheet_count(),
        path.display()
    );
    Ok(())
}
