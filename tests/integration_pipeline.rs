//! End-to-end tests for the complete process-one-file pipeline,
//! exercising real files in a temporary directory with the built-in
//! benchmark rule set.

use log_tabulator::config::{RuleSet, RulesSpec};
use log_tabulator::processor::process_log;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn benchmark_rules() -> Arc<RuleSet> {
    Arc::new(RuleSet::compile(&RulesSpec::default()).unwrap())
}

/// Representative slice of the benchmark log format the default rules
/// were written for.
const SAMPLE_LOG: &str = "\
allocation efficiency test:
Node size 8:
length: 100, #iteration: 10
Alloc: 1.25
Free: 2.5
length: 200, #iteration: 10
Alloc: 1.5
Free: 2.75
list traverse test:
Node size 8:
length: 100, #iteration: 10
Traverse: 0.75
IFP GT Max Num Objects: 4096
";

#[test]
fn test_process_log_writes_workbook() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("log.txt");
    let output = temp_dir.path().join("result.xlsx");
    fs::write(&input, SAMPLE_LOG).unwrap();

    let stats = process_log(&input, &output, benchmark_rules()).unwrap();

    assert!(stats.output_written);
    assert_eq!(stats.data_points, 5);
    assert_eq!(stats.lines_skipped, 1);
    assert_eq!(stats.unrecognized_lines, 0);
    assert_eq!(stats.sheets_produced, 2);
    assert!(output.exists());
    assert!(fs::metadata(&output).unwrap().len() > 0);
}

#[test]
fn test_data_before_first_sheet_match_is_emitted() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("log.txt");
    let output = temp_dir.path().join("result.xlsx");
    // The data line arrives before any series header: it belongs to the
    // default worksheet, not the void.
    fs::write(&input, "Count: 3.5\n").unwrap();

    let stats = process_log(&input, &output, benchmark_rules()).unwrap();

    assert!(stats.output_written);
    assert_eq!(stats.data_points, 1);
    assert_eq!(stats.sheets_produced, 1);
    assert!(output.exists());
    assert!(fs::metadata(&output).unwrap().len() > 0);
}

#[test]
fn test_no_data_produces_no_output_file() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("log.txt");
    let output = temp_dir.path().join("result.xlsx");
    fs::write(&input, "nothing here matches\nany rule at all\n").unwrap();

    let stats = process_log(&input, &output, benchmark_rules()).unwrap();

    assert!(!stats.output_written);
    assert_eq!(stats.data_points, 0);
    assert_eq!(stats.unrecognized_lines, 2);
    assert!(!output.exists());
}

#[test]
fn test_empty_input_produces_no_output_file() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("log.txt");
    let output = temp_dir.path().join("result.xlsx");
    fs::write(&input, "").unwrap();

    let stats = process_log(&input, &output, benchmark_rules()).unwrap();

    assert!(!stats.output_written);
    assert_eq!(stats.lines_read, 0);
    assert!(!output.exists());
}

#[test]
fn test_missing_input_fails() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("does-not-exist.txt");
    let output = temp_dir.path().join("result.xlsx");

    let result = process_log(&input, &output, benchmark_rules());

    assert!(matches!(
        result,
        Err(log_tabulator::Error::FileNotFound { .. })
    ));
    assert!(!output.exists());
}

#[test]
fn test_rules_file_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let rules_path = temp_dir.path().join("rules.toml");
    fs::write(
        &rules_path,
        toml::to_string(&RulesSpec::default()).unwrap(),
    )
    .unwrap();

    let spec = RulesSpec::from_toml_file(&rules_path).unwrap();
    let rules = RuleSet::compile(&spec).unwrap();
    assert_eq!(rules.dimension_count(), 3);
}

#[test]
fn test_malformed_rules_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let rules_path = temp_dir.path().join("rules.toml");
    fs::write(&rules_path, "hierarchy = \"not a list\"").unwrap();

    let result = RulesSpec::from_toml_file(&rules_path);
    assert!(matches!(
        result,
        Err(log_tabulator::Error::RulesFile { .. })
    ));
}
