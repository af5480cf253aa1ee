//! Unit tests for the tabulation services.

pub mod report_writer_tests;

// Test helper functions and fixtures
use crate::config::{
    DimensionRole, HierarchySpec, RowRuleSpec, RuleSet, RulesSpec, SeriesEntry,
};
use std::sync::Arc;

/// Compile the built-in benchmark rule set
pub fn benchmark_rules() -> Arc<RuleSet> {
    Arc::new(RuleSet::compile(&RulesSpec::default()).unwrap())
}

/// A rule set with every role in play: sheet series, row, col, and one
/// title dimension.
pub fn full_role_rules() -> Arc<RuleSet> {
    let spec = RulesSpec {
        hierarchy: vec![
            HierarchySpec {
                role: DimensionRole::Sheet,
                pattern: None,
                group: None,
                series: Some(vec![
                    SeriesEntry {
                        line: "phase one:".to_string(),
                        name: "One".to_string(),
                    },
                    SeriesEntry {
                        line: "phase two:".to_string(),
                        name: "Two".to_string(),
                    },
                ]),
            },
            HierarchySpec {
                role: DimensionRole::Title,
                pattern: Some(r"run (?P<Run>\d+)".to_string()),
                group: Some("Run".to_string()),
                series: None,
            },
            HierarchySpec {
                role: DimensionRole::Row,
                pattern: Some(r"workload (?P<Workload>\w+)".to_string()),
                group: Some("Workload".to_string()),
                series: None,
            },
            HierarchySpec {
                role: DimensionRole::Col,
                pattern: Some(r"threads (?P<Threads>\d+)".to_string()),
                group: Some("Threads".to_string()),
                series: None,
            },
        ],
        skip_literals: vec!["---".to_string()],
        skip_patterns: vec![r"warming up".to_string()],
        row_rules: vec![
            RowRuleSpec {
                pattern: r"(?P<metric>\w+): (?P<value>\S+)".to_string(),
                key_group: Some("metric".to_string()),
                key_literal: None,
                value_group: "value".to_string(),
            },
            RowRuleSpec {
                pattern: r"elapsed (?P<secs>[\d.]+)s".to_string(),
                key_group: None,
                key_literal: Some("elapsed".to_string()),
                value_group: "secs".to_string(),
            },
        ],
    };
    Arc::new(RuleSet::compile(&spec).unwrap())
}
