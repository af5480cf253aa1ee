//! Tests for workbook layout and cell typing, using a recording sink.

use super::full_role_rules;
use crate::app::models::CellValue;
use crate::app::services::DataCollector;
use crate::app::services::report_writer::{SheetSink, write_tables};
use crate::Result;

/// Records every positioned write for assertion.
#[derive(Debug, Default)]
struct RecordingSink {
    writes: Vec<(u32, u16, CellValue)>,
}

impl SheetSink for RecordingSink {
    fn write(&mut self, row: u32, col: u16, value: &CellValue) -> Result<()> {
        self.writes.push((row, col, value.clone()));
        Ok(())
    }
}

impl RecordingSink {
    fn at(&self, row: u32, col: u16) -> Option<&CellValue> {
        self.writes
            .iter()
            .find(|(r, c, _)| *r == row && *c == col)
            .map(|(_, _, v)| v)
    }
}

fn snapshot(title: &str, row: &str, col: &str) -> Vec<Option<String>> {
    vec![
        None,
        Some(title.to_string()),
        Some(row.to_string()),
        Some(col.to_string()),
    ]
}

#[test]
fn test_single_table_layout() {
    let mut collector = DataCollector::new(full_role_rules());
    collector.add_data(&snapshot("5", "alpha", "10"), "k", "1.5");
    collector.add_data(&snapshot("5", "alpha", "20"), "k", "2.5");
    collector.add_data(&snapshot("5", "beta", "10"), "k", "42");

    let mut sink = RecordingSink::default();
    let rows = write_tables(collector.default_tables(), &mut sink).unwrap();

    // title row + 2 data rows + blank separator
    assert_eq!(rows, 4);
    assert_eq!(sink.at(0, 0), Some(&CellValue::Int(5)));
    assert_eq!(sink.at(0, 1), Some(&CellValue::Int(10)));
    assert_eq!(sink.at(0, 2), Some(&CellValue::Int(20)));
    assert_eq!(sink.at(1, 0), Some(&CellValue::Text("alpha".to_string())));
    assert_eq!(sink.at(1, 1), Some(&CellValue::Float(1.5)));
    assert_eq!(sink.at(1, 2), Some(&CellValue::Float(2.5)));
    assert_eq!(sink.at(2, 0), Some(&CellValue::Text("beta".to_string())));
    assert_eq!(sink.at(2, 1), Some(&CellValue::Int(42)));
    // beta has no value in column 20: nothing written there
    assert_eq!(sink.at(2, 2), None);
}

#[test]
fn test_stacked_tables_leave_blank_separator_row() {
    let mut collector = DataCollector::new(full_role_rules());
    collector.add_data(&snapshot("first", "r", "c"), "k", "1");
    collector.add_data(&snapshot("second", "r", "c"), "k", "2");

    let mut sink = RecordingSink::default();
    let rows = write_tables(collector.default_tables(), &mut sink).unwrap();

    // Each table: title row + 1 data row + blank row
    assert_eq!(rows, 6);
    assert_eq!(sink.at(0, 0), Some(&CellValue::Text("first".to_string())));
    assert_eq!(sink.at(1, 1), Some(&CellValue::Int(1)));
    // Row 2 is the separator: no writes anywhere on it
    assert!(sink.writes.iter().all(|(r, _, _)| *r != 2));
    assert_eq!(sink.at(3, 0), Some(&CellValue::Text("second".to_string())));
    assert_eq!(sink.at(4, 1), Some(&CellValue::Int(2)));
}

#[test]
fn test_empty_group_writes_nothing() {
    let mut sink = RecordingSink::default();
    let rows = write_tables(&[], &mut sink).unwrap();
    assert_eq!(rows, 0);
    assert!(sink.writes.is_empty());
}

#[test]
fn test_values_are_natively_typed() {
    let mut collector = DataCollector::new(full_role_rules());
    collector.add_data(&snapshot("t", "r", "int"), "k", "42");
    collector.add_data(&snapshot("t", "r", "float"), "k", "3.14");
    collector.add_data(&snapshot("t", "r", "neg"), "k", "-7");
    collector.add_data(&snapshot("t", "r", "text"), "k", "abc");

    let mut sink = RecordingSink::default();
    write_tables(collector.default_tables(), &mut sink).unwrap();

    assert_eq!(sink.at(1, 1), Some(&CellValue::Int(42)));
    assert_eq!(sink.at(1, 2), Some(&CellValue::Float(3.14)));
    assert_eq!(sink.at(1, 3), Some(&CellValue::Int(-7)));
    assert_eq!(sink.at(1, 4), Some(&CellValue::Text("abc".to_string())));
}
