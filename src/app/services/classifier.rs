//! Line classification against the compiled rule set.
//!
//! Classification is a pure function of the trimmed line. Precedence is
//! fixed: skip rules first, then the hierarchy extractors in their
//! configured priority order, then the row rules in order. A line that
//! matches a hierarchy extractor never reaches the row rules, so a single
//! line can update exactly one dimension and nothing else.

use std::sync::Arc;

use crate::app::models::LineClass;
use crate::config::{RowKey, RuleSet};

/// Classifies individual log lines against a compiled [`RuleSet`].
#[derive(Debug, Clone)]
pub struct LineClassifier {
    rules: Arc<RuleSet>,
}

impl LineClassifier {
    pub fn new(rules: Arc<RuleSet>) -> Self {
        Self { rules }
    }

    /// Classify one raw input line.
    ///
    /// The caller is responsible for applying the result (updating
    /// hierarchy state, forwarding row data); this function has no side
    /// effects.
    pub fn classify(&self, line: &str) -> LineClass {
        let trimmed = line.trim();

        if self.is_skip_line(trimmed) {
            return LineClass::Skip;
        }

        for (dimension, rule) in self.rules.hierarchy.iter().enumerate() {
            if let Some(value) = rule.extractor.extract(trimmed) {
                return LineClass::HierarchyUpdate { dimension, value };
            }
        }

        for rule in &self.rules.row_rules {
            if let Some(caps) = rule.regex.captures(trimmed) {
                let key = match &rule.key {
                    RowKey::Group(group) => match caps.name(group.as_str()) {
                        Some(m) => m.as_str().to_string(),
                        // optional group did not participate in the match
                        None => continue,
                    },
                    RowKey::Literal(literal) => literal.clone(),
                };
                let Some(value) = caps.name(rule.value_group.as_str()) else {
                    continue;
                };
                return LineClass::RowData {
                    key,
                    value: value.as_str().to_string(),
                };
            }
        }

        LineClass::Unrecognized
    }

    fn is_skip_line(&self, trimmed: &str) -> bool {
        if self.rules.skip_literals.iter().any(|s| s == trimmed) {
            return true;
        }
        self.rules.skip_patterns.iter().any(|re| re.is_match(trimmed))
    }
}
