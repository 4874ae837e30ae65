//! Core domain models for rule outcomes and validation reports
//!
//! Architecture: Rich Domain Models - Reports are aggregates with behavior, not just data
//! - ValidationResult records one rule applied to one entity
//! - ValidationReport is the aggregate root, nesting keyed sub-reports in catalog order
//! - Pass/fail status and summaries are derived on demand, never stored

use crate::domain::descriptors::{Column, EntityKind, EntityRef};
use serde::{Deserialize, Serialize};

/// Severity levels attached to governance rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational findings
    Info,
    /// Findings that should be addressed before publication
    Warning,
    /// Findings that block publication
    Error,
}

impl Severity {
    /// Whether a failure at this severity should block publication
    pub fn is_blocking(self) -> bool {
        matches!(self, Self::Error)
    }

    /// Convert to string for display
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// Broad family a rule belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    /// Naming conventions (case, length, characters)
    Naming,
    /// Required metadata (owners, descriptions, tags)
    Metadata,
    /// Structural relationships and shape
    Structural,
}

impl RuleCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Naming => "naming",
            Self::Metadata => "metadata",
            Self::Structural => "structural",
        }
    }
}

/// Outcome of evaluating one rule against one entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Identifier of the rule that produced this result
    pub rule_id: String,
    /// Entity the rule was evaluated against
    pub target: EntityRef,
    /// Whether the entity satisfied the rule
    pub passed: bool,
    /// Human-readable explanation
    pub message: String,
    /// Severity of the rule
    pub severity: Severity,
    /// Category of the rule
    pub category: RuleCategory,
}

impl ValidationResult {
    /// Create a passing result
    pub fn pass(
        rule_id: impl Into<String>,
        target: EntityRef,
        severity: Severity,
        category: RuleCategory,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            target,
            passed: true,
            message: message.into(),
            severity,
            category,
        }
    }

    /// Create a failing result
    pub fn fail(
        rule_id: impl Into<String>,
        target: EntityRef,
        severity: Severity,
        category: RuleCategory,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            target,
            passed: false,
            message: message.into(),
            severity,
            category,
        }
    }

    /// Whether this result is a failure that blocks publication
    pub fn is_blocking(&self) -> bool {
        !self.passed && self.severity.is_blocking()
    }

}

/// Descriptor value recorded next to the results it was checked by
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), value: value.into() }
    }
}

/// Sub-report stored under the name of the entity it covers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyedReport {
    pub key: String,
    pub report: ValidationReport,
}

/// Ordered results of one check invocation
///
/// Leaf checks fill `results`; bulk checks fill `children`, keyed by entity
/// name in the order the catalog listed the entities. Recursive checks use
/// both: a domain report carries the domain's own results and one child per
/// data product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Entity this report covers, absent for pure aggregates
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub target: Option<EntityRef>,
    /// Descriptor values of the target, as they were when checked
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub attributes: Vec<Attribute>,
    /// Column listing when the target is a dataset
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub columns: Vec<Column>,
    /// Results for the target entity, in rule declaration order
    #[serde(default)]
    pub results: Vec<ValidationResult>,
    /// Keyed sub-reports in catalog iteration order
    #[serde(default)]
    pub children: Vec<KeyedReport>,
}

impl ValidationReport {
    /// Create an empty aggregate report
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty report covering one entity
    pub fn for_entity(target: EntityRef) -> Self {
        Self { target: Some(target), ..Self::default() }
    }

    /// Record the descriptor values the results refer to
    pub fn with_attributes(mut self, attributes: Vec<Attribute>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Record the column listing of a dataset
    pub fn with_columns(mut self, columns: Vec<Column>) -> Self {
        self.columns = columns;
        self
    }

    /// Append a result, keeping insertion order
    pub fn add_result(&mut self, result: ValidationResult) {
        self.results.push(result);
    }

    /// Append a keyed sub-report, keeping insertion order
    pub fn add_child(&mut self, key: impl Into<String>, report: ValidationReport) {
        self.children.push(KeyedReport { key: key.into(), report });
    }

    /// Look up a sub-report by entity name
    pub fn child(&self, key: &str) -> Option<&ValidationReport> {
        self.children.iter().find(|c| c.key == key).map(|c| &c.report)
    }

    /// Keys of the sub-reports in order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.children.iter().map(|c| c.key.as_str())
    }

    /// Whether every result in the report, recursively, passed
    pub fn passed(&self) -> bool {
        self.results.iter().all(|r| r.passed) && self.children.iter().all(|c| c.report.passed())
    }

    /// Whether any failing result blocks publication
    pub fn has_blocking_failures(&self) -> bool {
        self.all_results().any(|r| r.is_blocking())
    }

    /// Depth-first iterator over every result, own results before children
    pub fn all_results(&self) -> Box<dyn Iterator<Item = &ValidationResult> + '_> {
        Box::new(
            self.results
                .iter()
                .chain(self.children.iter().flat_map(|c| c.report.all_results())),
        )
    }

    /// All failing results in report order
    pub fn failures(&self) -> Vec<&ValidationResult> {
        self.all_results().filter(|r| !r.passed).collect()
    }

    /// Copy of the report keeping only failing results and the sub-reports containing them
    pub fn failures_only(&self) -> ValidationReport {
        ValidationReport {
            target: self.target.clone(),
            attributes: self.attributes.clone(),
            columns: self.columns.clone(),
            results: self.results.iter().filter(|r| !r.passed).cloned().collect(),
            children: self
                .children
                .iter()
                .filter(|c| !c.report.passed())
                .map(|c| KeyedReport { key: c.key.clone(), report: c.report.failures_only() })
                .collect(),
        }
    }

    /// Compute summary statistics
    pub fn summary(&self) -> ReportSummary {
        let mut summary = ReportSummary::default();
        self.accumulate(&mut summary);
        summary
    }

    fn accumulate(&self, summary: &mut ReportSummary) {
        if let Some(target) = &self.target {
            summary.entities.add(target.kind);
        }
        for result in &self.results {
            summary.rules_evaluated += 1;
            if result.passed {
                summary.passed += 1;
            } else {
                summary.failures_by_severity.add(result.severity);
            }
        }
        for child in &self.children {
            child.report.accumulate(summary);
        }
    }
}

/// Summary statistics for a validation report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Entities covered, by kind
    pub entities: EntityCounts,
    /// Total number of rule evaluations
    pub rules_evaluated: usize,
    /// Number of passing evaluations
    pub passed: usize,
    /// Number of failing evaluations by severity
    pub failures_by_severity: FailureCounts,
}

impl ReportSummary {
    pub fn failed(&self) -> usize {
        self.failures_by_severity.total()
    }
}

/// Count of entities by kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCounts {
    pub domains: usize,
    pub data_products: usize,
    pub datasets: usize,
}

impl EntityCounts {
    pub fn add(&mut self, kind: EntityKind) {
        match kind {
            EntityKind::Domain => self.domains += 1,
            EntityKind::DataProduct => self.data_products += 1,
            EntityKind::Dataset => self.datasets += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.domains + self.data_products + self.datasets
    }
}

/// Count of failures by severity level
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureCounts {
    pub error: usize,
    pub warning: usize,
    pub info: usize,
}

impl FailureCounts {
    /// Total number of failures across all severities
    pub fn total(&self) -> usize {
        self.error + self.warning + self.info
    }

    /// Add a failure to the counts
    pub fn add(&mut self, severity: Severity) {
        match severity {
            Severity::Error => self.error += 1,
            Severity::Warning => self.warning += 1,
            Severity::Info => self.info += 1,
        }
    }
}

/// Error types that can occur while checking the catalog
///
/// A missing entity or an unreachable provider is a hard error, distinct from
/// a report with failing results.
#[derive(Debug, thiserror::Error)]
pub enum CheckerError {
    /// Requested entity does not exist in the catalog
    #[error("{kind} '{name}' not found")]
    NotFound { kind: EntityKind, name: String },

    /// Descriptor provider could not be reached or read
    #[error("Catalog unavailable: {message}")]
    ProviderUnavailable { message: String },

    /// Descriptor provider returned data that fails boundary validation
    #[error("Malformed catalog data: {message}")]
    Malformed { message: String },

    /// Configuration file could not be loaded or parsed
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Report could not be rendered in the requested format
    #[error("Report rendering failed: {message}")]
    Render { message: String },

    /// Output could not be written
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl CheckerError {
    /// Create a not-found error
    pub fn not_found(kind: EntityKind, name: impl Into<String>) -> Self {
        Self::NotFound { kind, name: name.into() }
    }

    /// Create a provider-unavailable error
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::ProviderUnavailable { message: message.into() }
    }

    /// Create a malformed-data error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed { message: message.into() }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }

    /// Create a report rendering error
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render { message: message.into() }
    }

    /// Whether the error reports a missing entity
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type for checker operations
pub type CheckerResult<T> = Result<T, CheckerError>;
