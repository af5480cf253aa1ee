//! Incremental table assembly.
//!
//! The [`DataCollector`] owns every table produced by a run, partitioned
//! into output groups by the `sheet`-role dimension. Each incoming data
//! point either fills a gap in the most recent table of its group or
//! starts a new table behind it. Repeated measurement passes over the
//! same hierarchy context therefore stack as separate tables in temporal
//! order instead of overwriting one another.

use std::sync::Arc;
use tracing::trace;

use crate::app::models::Table;
use crate::config::{DimensionRole, RuleSet};

/// One addressable region of the output workbook.
#[derive(Debug)]
pub struct OutputGroup {
    /// Sheet-key value this group was created for
    pub name: String,
    /// Tables in creation order
    pub tables: Vec<Table>,
}

/// Assembles classified data points into tables grouped by sheet key.
#[derive(Debug)]
pub struct DataCollector {
    rules: Arc<RuleSet>,
    named_groups: Vec<OutputGroup>,
    default_tables: Vec<Table>,
}

impl DataCollector {
    pub fn new(rules: Arc<RuleSet>) -> Self {
        Self {
            rules,
            named_groups: Vec::new(),
            default_tables: Vec::new(),
        }
    }

    /// Record one data point under the given hierarchy snapshot.
    ///
    /// `hierarchy` must have one slot per configured dimension; unset
    /// dimensions fall back to defaults (default group for `sheet`, the
    /// data key for `row`/`col`, an empty contribution to the title).
    pub fn add_data(&mut self, hierarchy: &[Option<String>], key: &str, value: &str) {
        debug_assert_eq!(hierarchy.len(), self.rules.dimension_count());

        let mut sheet_key: Option<&str> = None;
        let mut row_name = key;
        let mut col_name = key;
        let mut title_parts: Vec<&str> = Vec::new();

        for (i, rule) in self.rules.hierarchy.iter().enumerate() {
            let current = hierarchy[i].as_deref();
            match rule.role {
                DimensionRole::Sheet => sheet_key = current,
                DimensionRole::Row => {
                    if let Some(v) = current {
                        row_name = v;
                    }
                }
                DimensionRole::Col => {
                    if let Some(v) = current {
                        col_name = v;
                    }
                }
                DimensionRole::Title => title_parts.push(current.unwrap_or("")),
            }
        }
        let title = title_parts.join(",");

        trace!(
            "add_data: sheet={:?} title={:?} row={:?} col={:?} value={:?}",
            sheet_key, title, row_name, col_name, value
        );

        let tables = match sheet_key {
            Some(name) => self.group_tables_mut(name),
            None => &mut self.default_tables,
        };
        Self::fill_or_start(tables, &title, row_name, col_name, value);
    }

    /// Fill into the last table of the group when the title matches and a
    /// slot is free; otherwise append a fresh single-entry table.
    fn fill_or_start(tables: &mut Vec<Table>, title: &str, row: &str, col: &str, value: &str) {
        if let Some(last) = tables.last_mut() {
            if last.title() == title && last.try_fill(row, col, value) {
                return;
            }
        }
        tables.push(Table::seeded(title, row, col, value));
    }

    fn group_tables_mut(&mut self, name: &str) -> &mut Vec<Table> {
        if let Some(pos) = self.named_groups.iter().position(|g| g.name == name) {
            return &mut self.named_groups[pos].tables;
        }
        self.named_groups.push(OutputGroup {
            name: name.to_string(),
            tables: Vec::new(),
        });
        &mut self.named_groups.last_mut().unwrap().tables
    }

    /// Named output groups in first-seen order
    pub fn named_groups(&self) -> &[OutputGroup] {
        &self.named_groups
    }

    /// Tables collected outside any named group
    pub fn default_tables(&self) -> &[Table] {
        &self.default_tables
    }

    /// Tables of the named group, for inspection
    pub fn group(&self, name: &str) -> Option<&[Table]> {
        self.named_groups
            .iter()
            .find(|g| g.name == name)
            .map(|g| g.tables.as_slice())
    }

    /// Whether the rule set partitions output into named sheets
    pub fn has_sheet_dimension(&self) -> bool {
        self.rules.sheet_dim().is_some()
    }

    /// Total number of tables across all groups
    pub fn table_count(&self) -> usize {
        self.default_tables.len()
            + self
                .named_groups
                .iter()
                .map(|g| g.tables.len())
                .sum::<usize>()
    }

    /// Number of output regions that will be emitted
    pub fn sheet_count(&self) -> usize {
        if self.has_sheet_dimension() {
            // data seen before the first sheet match still gets a
            // default worksheet
            self.named_groups.len() + usize::from(!self.default_tables.is_empty())
        } else {
            1
        }
    }
}
