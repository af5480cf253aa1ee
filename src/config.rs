//! Declarative matching rules and their validated, compiled form.
//!
//! The rule surface comes in two layers. [`RulesSpec`] is plain serde data
//! (string patterns, literal tables, role names) that can be embedded as a
//! built-in default or loaded from a TOML rules file. [`RuleSet`] is the
//! compiled form used by the classifier and collector: anchored
//! [`regex::Regex`] values, tagged extractor variants, and cached role
//! positions. Compilation validates every invariant once, before any input
//! is read; a violation is fatal.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::{Error, Result};

/// Environment variable naming an optional TOML rules file.
pub const RULES_FILE_ENV: &str = "LOG_TABULATOR_RULES";

/// Structural role a hierarchy dimension's current value plays when a
/// data row is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionRole {
    /// Selects the output worksheet
    Sheet,
    /// Vertical header in the first column
    Row,
    /// Horizontal header in the first row
    Col,
    /// Merged with other title dimensions into the table title
    Title,
}

/// One literal-to-canonical-name entry of a keyword series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesEntry {
    /// Exact line text to match (after trimming)
    pub line: String,
    /// Canonical series name recorded as the dimension value
    pub name: String,
}

/// One hierarchy dimension as declared in a rules file.
///
/// Exactly one of `pattern`+`group` or `series` must be given; the
/// validation in [`RuleSet::compile`] rejects everything else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HierarchySpec {
    /// Role of this dimension
    pub role: DimensionRole,
    /// Regex matched against the trimmed line, anchored at line start
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Named capture group supplying the dimension value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Keyword series: exact literal lines mapped to canonical names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<Vec<SeriesEntry>>,
}

/// One row-data rule as declared in a rules file.
///
/// Exactly one of `key_group` or `key_literal` must be given.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowRuleSpec {
    /// Regex matched against the trimmed line, anchored at line start
    pub pattern: String,
    /// Named capture group supplying the cell key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_group: Option<String>,
    /// Fixed literal cell key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_literal: Option<String>,
    /// Named capture group supplying the cell value
    pub value_group: String,
}

/// Complete declarative rule specification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesSpec {
    /// Ordered hierarchy dimensions; list order is the match priority
    pub hierarchy: Vec<HierarchySpec>,
    /// Lines equal to any of these (after trimming) are skipped
    #[serde(default)]
    pub skip_literals: Vec<String>,
    /// Lines matching any of these at line start are skipped
    #[serde(default)]
    pub skip_patterns: Vec<String>,
    /// Ordered row-data rules; first match wins
    pub row_rules: Vec<RowRuleSpec>,
}

impl Default for RulesSpec {
    /// Built-in rule set for the memory-benchmark logs this tool was
    /// written for: one series dimension selecting the worksheet, node
    /// size as the table title, list length as the column header.
    fn default() -> Self {
        Self {
            hierarchy: vec![
                HierarchySpec {
                    role: DimensionRole::Sheet,
                    pattern: None,
                    group: None,
                    series: Some(vec![
                        SeriesEntry {
                            line: "allocation efficiency test:".to_string(),
                            name: "Allocation".to_string(),
                        },
                        SeriesEntry {
                            line: "list traverse test:".to_string(),
                            name: "Traverse".to_string(),
                        },
                    ]),
                },
                HierarchySpec {
                    role: DimensionRole::Title,
                    pattern: Some(r"Node size (?P<NodeSize>\d+):".to_string()),
                    group: Some("NodeSize".to_string()),
                    series: None,
                },
                HierarchySpec {
                    role: DimensionRole::Col,
                    pattern: Some(
                        r"length: (?P<ListLength>\d+), #iteration: (?:\d+)".to_string(),
                    ),
                    group: Some("ListLength".to_string()),
                    series: None,
                },
            ],
            skip_literals: Vec::new(),
            skip_patterns: vec![r"IFP GT Max Num Objects: \d+".to_string()],
            row_rules: vec![RowRuleSpec {
                pattern: r"(?P<column>\w+): (?P<value>\d+\.\d+)".to_string(),
                key_group: Some("column".to_string()),
                key_literal: None,
                value_group: "value".to_string(),
            }],
        }
    }
}

impl RulesSpec {
    /// Load a rule specification from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::rules_file(path.display().to_string(), e.to_string()))?;
        let spec: RulesSpec = toml::from_str(&content)
            .map_err(|e| Error::rules_file(path.display().to_string(), e.to_string()))?;
        debug!(
            "Loaded rules file {}: {} hierarchy dimensions, {} row rules",
            path.display(),
            spec.hierarchy.len(),
            spec.row_rules.len()
        );
        Ok(spec)
    }

    /// Resolve the active rule specification: the file named by
    /// `LOG_TABULATOR_RULES` when set, the built-in defaults otherwise.
    pub fn load() -> Result<Self> {
        match std::env::var_os(RULES_FILE_ENV) {
            Some(path) => Self::from_toml_file(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }
}

/// Compiled extractor for one hierarchy dimension.
#[derive(Debug)]
pub enum HierarchyExtractor {
    /// Anchored regex with a named capture group for the value
    Pattern { regex: Regex, group: String },
    /// Exact-literal lookup table mapping lines to canonical names
    Series { table: Vec<(String, String)> },
}

impl HierarchyExtractor {
    /// Try this extractor against a trimmed line, returning the
    /// extracted dimension value on a match.
    pub fn extract(&self, line: &str) -> Option<String> {
        match self {
            Self::Pattern { regex, group } => regex
                .captures(line)
                .and_then(|caps| caps.name(group.as_str()))
                .map(|m| m.as_str().to_string()),
            Self::Series { table } => table
                .iter()
                .find(|(literal, _)| literal == line)
                .map(|(_, name)| name.clone()),
        }
    }
}

/// Compiled rule for one hierarchy dimension.
#[derive(Debug)]
pub struct HierarchyRule {
    pub role: DimensionRole,
    pub extractor: HierarchyExtractor,
}

/// Where a row rule takes the cell key from.
#[derive(Debug)]
pub enum RowKey {
    /// Named capture group of the row rule's regex
    Group(String),
    /// Fixed literal
    Literal(String),
}

/// Compiled row-data rule.
#[derive(Debug)]
pub struct RowRule {
    pub regex: Regex,
    pub key: RowKey,
    pub value_group: String,
}

/// Validated, immutable rule set driving classification and assembly.
#[derive(Debug)]
pub struct RuleSet {
    pub hierarchy: Vec<HierarchyRule>,
    pub skip_literals: Vec<String>,
    pub skip_patterns: Vec<Regex>,
    pub row_rules: Vec<RowRule>,
    sheet_dim: Option<usize>,
    row_dim: Option<usize>,
    col_dim: Option<usize>,
}

/// Compile a pattern anchored at line start, matching Python-style
/// `re.match` semantics the rule surface is written against.
fn compile_anchored(pattern: &str, context: &str) -> Result<Regex> {
    Regex::new(&format!("^(?:{pattern})"))
        .map_err(|e| Error::configuration(format!("invalid regex in {context}: {e}")))
}

/// Check that a compiled regex actually defines the named capture group.
fn require_group(regex: &Regex, group: &str, context: &str) -> Result<()> {
    let found = regex
        .capture_names()
        .any(|name| name == Some(group));
    if found {
        Ok(())
    } else {
        Err(Error::configuration(format!(
            "capture group '{group}' not defined by the regex in {context}"
        )))
    }
}

impl RuleSet {
    /// Compile and validate a rule specification.
    ///
    /// Fails when a regex does not compile, when a named capture group is
    /// missing, when a hierarchy entry declares both or neither of
    /// pattern/series, when a row rule declares both or neither of
    /// key group/literal, when more than one dimension claims the
    /// `sheet`, `row` or `col` role, or when neither `row` nor `col` is
    /// assigned at all.
    pub fn compile(spec: &RulesSpec) -> Result<Self> {
        let mut hierarchy = Vec::with_capacity(spec.hierarchy.len());
        let mut sheet_dim = None;
        let mut row_dim = None;
        let mut col_dim = None;

        for (i, dim) in spec.hierarchy.iter().enumerate() {
            let context = format!("hierarchy dimension {i}");
            let extractor = match (&dim.pattern, &dim.series) {
                (Some(pattern), None) => {
                    let group = dim.group.as_ref().ok_or_else(|| {
                        Error::configuration(format!(
                            "{context}: pattern extractor requires a capture group name"
                        ))
                    })?;
                    let regex = compile_anchored(pattern, &context)?;
                    require_group(&regex, group, &context)?;
                    HierarchyExtractor::Pattern {
                        regex,
                        group: group.clone(),
                    }
                }
                (None, Some(series)) => {
                    if series.is_empty() {
                        return Err(Error::configuration(format!(
                            "{context}: series lookup table is empty"
                        )));
                    }
                    HierarchyExtractor::Series {
                        table: series
                            .iter()
                            .map(|e| (e.line.clone(), e.name.clone()))
                            .collect(),
                    }
                }
                _ => {
                    return Err(Error::configuration(format!(
                        "{context}: exactly one of pattern or series must be given"
                    )));
                }
            };

            let slot = match dim.role {
                DimensionRole::Sheet => Some((&mut sheet_dim, "sheet")),
                DimensionRole::Row => Some((&mut row_dim, "row")),
                DimensionRole::Col => Some((&mut col_dim, "col")),
                DimensionRole::Title => None,
            };
            if let Some((slot, role_name)) = slot {
                if slot.is_some() {
                    return Err(Error::configuration(format!(
                        "{context}: role '{role_name}' is already assigned to another dimension"
                    )));
                }
                *slot = Some(i);
            }

            hierarchy.push(HierarchyRule {
                role: dim.role,
                extractor,
            });
        }

        if row_dim.is_none() && col_dim.is_none() {
            return Err(Error::configuration(
                "at least one hierarchy dimension must have the 'row' or 'col' role",
            ));
        }

        let skip_patterns = spec
            .skip_patterns
            .iter()
            .enumerate()
            .map(|(i, p)| compile_anchored(p, &format!("skip pattern {i}")))
            .collect::<Result<Vec<_>>>()?;

        let mut row_rules = Vec::with_capacity(spec.row_rules.len());
        for (i, rule) in spec.row_rules.iter().enumerate() {
            let context = format!("row rule {i}");
            let regex = compile_anchored(&rule.pattern, &context)?;
            let key = match (&rule.key_group, &rule.key_literal) {
                (Some(group), None) => {
                    require_group(&regex, group, &context)?;
                    RowKey::Group(group.clone())
                }
                (None, Some(literal)) => RowKey::Literal(literal.clone()),
                _ => {
                    return Err(Error::configuration(format!(
                        "{context}: exactly one of key_group or key_literal must be given"
                    )));
                }
            };
            require_group(&regex, &rule.value_group, &context)?;
            row_rules.push(RowRule {
                regex,
                key,
                value_group: rule.value_group.clone(),
            });
        }

        debug!(
            "Compiled rule set: {} hierarchy dimensions, {} skip rules, {} row rules",
            hierarchy.len(),
            spec.skip_literals.len() + skip_patterns.len(),
            row_rules.len()
        );

        Ok(Self {
            hierarchy,
            skip_literals: spec.skip_literals.clone(),
            skip_patterns,
            row_rules,
            sheet_dim,
            row_dim,
            col_dim,
        })
    }

    /// Number of hierarchy dimensions
    pub fn dimension_count(&self) -> usize {
        self.hierarchy.len()
    }

    /// Index of the dimension with the `sheet` role, if any
    pub fn sheet_dim(&self) -> Option<usize> {
        self.sheet_dim
    }

    /// Index of the dimension with the `row` role, if any
    pub fn row_dim(&self) -> Option<usize> {
        self.row_dim
    }

    /// Index of the dimension with the `col` role, if any
    pub fn col_dim(&self) -> Option<usize> {
        self.col_dim
    }
}
