//! CLI command orchestration: logging setup, rule loading, processing,
//! and the end-of-run summary.

use anyhow::Context;
use std::sync::Arc;
use tracing::{debug, info};

use crate::cli::args::Args;
use crate::config::{RuleSet, RulesSpec};
use crate::processor::{self, RunStats};

/// Run the tabulator with parsed CLI arguments.
pub fn run(args: Args) -> anyhow::Result<RunStats> {
    setup_logging();

    // Compile rules before touching the input; invalid rules are fatal.
    let spec = RulesSpec::load().context("failed to load matching rules")?;
    let rules =
        Arc::new(RuleSet::compile(&spec).context("invalid matching rules")?);
    debug!(
        "Rule set ready: {} hierarchy dimensions",
        rules.dimension_count()
    );

    let stats = processor::process_log(&args.input, &args.output, rules)
        .with_context(|| format!("failed to process '{}'", args.input.display()))?;
    report_summary(&args, &stats);
    Ok(stats)
}

/// Set up structured logging.
///
/// Per-line diagnostics are part of the tool's normal output, so the
/// subscriber writes to stdout rather than stderr.
fn setup_logging() {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("log_tabulator=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .without_time()
                .with_writer(std::io::stdout),
        )
        .init();
}

/// Log the end-of-run summary.
fn report_summary(args: &Args, stats: &RunStats) {
    if stats.output_written {
        info!(
            "Done: {} lines read, {} data points, {} tables on {} sheet(s) written to {}",
            stats.lines_read,
            stats.data_points,
            stats.tables_produced,
            stats.sheets_produced,
            args.output.display()
        );
    } else {
        info!(
            "Done: {} lines read, no data points, no output written",
            stats.lines_read
        );
    }
    if stats.unrecognized_lines > 0 {
        info!("{} line(s) matched no rule", stats.unrecognized_lines);
    }
}
