//! Core data model for the tabulation engine.
//!
//! Defines the classification outcome for one input line, the [`Table`]
//! value type with its header/cell invariants enforced by construction,
//! and the [`CellValue`] coercion used when writing the output workbook.

use std::collections::HashMap;

/// Classification result for one trimmed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass {
    /// Line matches a configured skip rule; produces nothing
    Skip,
    /// Line updates one hierarchy dimension's current value
    HierarchyUpdate { dimension: usize, value: String },
    /// Line yields one key/value data pair
    RowData { key: String, value: String },
    /// Line matched no rule at all
    Unrecognized,
}

/// One row-header x column-header grid of values sharing a title.
///
/// Header lists track first-seen order; `cells` only ever holds keys that
/// are present in the header lists. Cells are written through
/// [`Table::try_fill`], which refuses to overwrite, so a table never loses
/// a value once recorded.
#[derive(Debug, Clone)]
pub struct Table {
    title: String,
    row_headers: Vec<String>,
    col_headers: Vec<String>,
    cells: HashMap<String, HashMap<String, String>>,
}

impl Table {
    /// Create a table seeded with a single cell.
    pub fn seeded(title: &str, row: &str, col: &str, value: &str) -> Self {
        let mut cells = HashMap::new();
        cells.insert(
            row.to_string(),
            HashMap::from([(col.to_string(), value.to_string())]),
        );
        Self {
            title: title.to_string(),
            row_headers: vec![row.to_string()],
            col_headers: vec![col.to_string()],
            cells,
        }
    }

    /// Attempt to absorb one (row, col, value) entry.
    ///
    /// Fill order: a new row header always fits (registering the column
    /// header too if unseen); an existing row with a new column header
    /// fits; an existing (row, col) position fits only while vacant.
    /// Returns false when the exact cell already holds a value, which is
    /// the caller's signal to start a fresh table.
    pub fn try_fill(&mut self, row: &str, col: &str, value: &str) -> bool {
        if !self.row_headers.iter().any(|r| r == row) {
            self.row_headers.push(row.to_string());
            if !self.col_headers.iter().any(|c| c == col) {
                self.col_headers.push(col.to_string());
            }
            self.cells
                .entry(row.to_string())
                .or_default()
                .insert(col.to_string(), value.to_string());
            return true;
        }
        if !self.col_headers.iter().any(|c| c == col) {
            self.col_headers.push(col.to_string());
            self.cells
                .entry(row.to_string())
                .or_default()
                .insert(col.to_string(), value.to_string());
            return true;
        }
        let row_cells = self.cells.entry(row.to_string()).or_default();
        if !row_cells.contains_key(col) {
            row_cells.insert(col.to_string(), value.to_string());
            return true;
        }
        false
    }

    /// Table title (empty string when no title dimensions are configured)
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Row headers in first-seen order
    pub fn row_headers(&self) -> &[String] {
        &self.row_headers
    }

    /// Column headers in first-seen order
    pub fn col_headers(&self) -> &[String] {
        &self.col_headers
    }

    /// Value at (row, col), if populated
    pub fn cell(&self, row: &str, col: &str) -> Option<&str> {
        self.cells
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
    }
}

/// A natively typed spreadsheet cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    /// Coerce a raw string to the most specific cell type.
    ///
    /// An optional leading minus followed only by ASCII digits is an
    /// integer; anything parseable as f64 is a float; everything else
    /// stays text. The input is trimmed first.
    pub fn coerce(raw: &str) -> Self {
        let trimmed = raw.trim();
        let digits = trimmed.strip_prefix('-').unwrap_or(trimmed);
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(i) = trimmed.parse::<i64>() {
                return Self::Int(i);
            }
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            return Self::Float(f);
        }
        Self::Text(trimmed.to_string())
    }
}
