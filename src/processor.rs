//! Single-pass log processing driver.
//!
//! Reads the input line by line in order, classifies each line, maintains
//! the hierarchy state vector across lines, and feeds data points to the
//! collector. The whole file is consumed before anything is written; when
//! no data point was produced the run finishes without creating an output
//! artifact at all.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::app::models::LineClass;
use crate::app::services::report_writer;
use crate::app::services::{DataCollector, LineClassifier};
use crate::config::RuleSet;
use crate::{Error, Result};

/// Statistics accumulated over one processing run.
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    /// Lines read from the input
    pub lines_read: usize,
    /// Lines matching a skip rule
    pub lines_skipped: usize,
    /// Hierarchy-update lines
    pub hierarchy_updates: usize,
    /// Data points forwarded to the collector
    pub data_points: usize,
    /// Lines matching no rule at all
    pub unrecognized_lines: usize,
    /// Tables assembled across all groups
    pub tables_produced: usize,
    /// Output regions (worksheets) that would be emitted
    pub sheets_produced: usize,
    /// Whether an output artifact was written
    pub output_written: bool,
}

/// Result of tabulating one input: the finished collector plus stats.
#[derive(Debug)]
pub struct TabulationOutcome {
    pub collector: DataCollector,
    pub stats: RunStats,
}

/// Tabulate every line of a buffered reader.
///
/// The hierarchy state starts all-unset and persists across lines until a
/// dimension is re-matched. Unrecognized lines are reported with their
/// 1-based line number and trimmed text, and processing continues.
pub fn tabulate_reader<R: BufRead>(reader: R, rules: Arc<RuleSet>) -> Result<TabulationOutcome> {
    let classifier = LineClassifier::new(Arc::clone(&rules));
    let mut collector = DataCollector::new(Arc::clone(&rules));
    let mut hierarchy: Vec<Option<String>> = vec![None; rules.dimension_count()];
    let mut stats = RunStats::default();

    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| Error::io(format!("reading line {}", index + 1), e))?;
        stats.lines_read += 1;

        match classifier.classify(&line) {
            LineClass::Skip => stats.lines_skipped += 1,
            LineClass::HierarchyUpdate { dimension, value } => {
                hierarchy[dimension] = Some(value);
                stats.hierarchy_updates += 1;
            }
            LineClass::RowData { key, value } => {
                collector.add_data(&hierarchy, &key, &value);
                stats.data_points += 1;
            }
            LineClass::Unrecognized => {
                warn!("line {} skipped: {}", index + 1, line.trim());
                stats.unrecognized_lines += 1;
            }
        }
    }

    stats.tables_produced = collector.table_count();
    stats.sheets_produced = collector.sheet_count();
    debug!(
        "Tabulated {} lines: {} data points, {} hierarchy updates, {} skipped, {} unrecognized",
        stats.lines_read,
        stats.data_points,
        stats.hierarchy_updates,
        stats.lines_skipped,
        stats.unrecognized_lines
    );

    Ok(TabulationOutcome { collector, stats })
}

/// Tabulate an input file.
pub fn tabulate_file(path: &Path, rules: Arc<RuleSet>) -> Result<TabulationOutcome> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::file_not_found(path.display().to_string())
        } else {
            Error::io(format!("opening input '{}'", path.display()), e)
        }
    })?;
    tabulate_reader(BufReader::new(file), rules)
}

/// Process one log file to completion: tabulate, then emit the workbook
/// unless the run produced no data at all.
pub fn process_log(input: &Path, output: &Path, rules: Arc<RuleSet>) -> Result<RunStats> {
    info!("Processing '{}'", input.display());
    let TabulationOutcome {
        collector,
        mut stats,
    } = tabulate_file(input, rules)?;

    if stats.data_points == 0 {
        info!("No data points collected, no output written");
        return Ok(stats);
    }

    report_writer::write_workbook(&collector, output)?;
    stats.output_written = true;
    Ok(stats)
}
