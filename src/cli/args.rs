//! Command-line argument definitions for the log tabulator
//!
//! The surface is deliberately tiny: two optional positional paths and no
//! flags. The matching rules come from the built-in defaults or from a
//! TOML file named by the `LOG_TABULATOR_RULES` environment variable.

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for the log tabulator
///
/// Converts an unstructured, line-oriented log file into a structured,
/// multi-table xlsx report driven by declarative matching rules.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "log-tabulator",
    version,
    about = "Convert line-oriented logs into multi-table xlsx reports",
    long_about = "Reads a log file line by line, classifies each line against an ordered \
                  set of declarative matching rules (skip rules, hierarchy extractors, \
                  row-data rules), and assembles the extracted values into tables written \
                  to an xlsx workbook. When no data line matches at all, no output file \
                  is created and the run still succeeds."
)]
pub struct Args {
    /// Input log file to tabulate
    #[arg(value_name = "INPUT", default_value = "log.txt")]
    pub input: PathBuf,

    /// Output xlsx workbook path
    #[arg(value_name = "OUTPUT", default_value = "result.xlsx")]
    pub output: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["log-tabulator"]);
        assert_eq!(args.input, PathBuf::from("log.txt"));
        assert_eq!(args.output, PathBuf::from("result.xlsx"));
    }

    #[test]
    fn test_positional_overrides() {
        let args = Args::parse_from(["log-tabulator", "bench.log", "bench.xlsx"]);
        assert_eq!(args.input, PathBuf::from("bench.log"));
        assert_eq!(args.output, PathBuf::from("bench.xlsx"));
    }
}
