//! Report generation with multiple output formats
//!
//! CDD Principle: Anti-Corruption Layer - Formatters translate domain objects to external formats
//! - ValidationReport (domain) is converted to terminal, JSON, JUnit and PDF representations
//! - Each formatter walks the report tree in order, so output is reproducible
//! - Domain logic remains pure while supporting multiple presentation needs

pub mod pdf;

use crate::domain::descriptors::EntityKind;
use crate::domain::results::{
    CheckerError, CheckerResult, ReportSummary, Severity, ValidationReport, ValidationResult,
};
use chrono::Utc;
use std::io::Write;
use std::str::FromStr;

/// Supported output formats for validation reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable tree with colors
    Human,
    /// JSON format for programmatic consumption
    Json,
    /// JUnit XML format for CI/CD integration
    Junit,
    /// PDF audit document, binary
    Pdf,
}

impl OutputFormat {
    /// Get all available format names
    pub fn all_formats() -> &'static [&'static str] {
        &["human", "json", "junit", "pdf"]
    }
}

impl FromStr for OutputFormat {
    type Err = CheckerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            "junit" => Ok(Self::Junit),
            "pdf" => Ok(Self::Pdf),
            other => Err(CheckerError::config(format!(
                "Unknown output format '{}', expected one of: {}",
                other,
                Self::all_formats().join(", ")
            ))),
        }
    }
}

/// Options for customizing report output
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Whether to use colored output (for human format)
    pub use_colors: bool,
    /// Whether to drop passing results and fully passing entities
    pub only_failures: bool,
    /// Configuration fingerprint stamped into machine-readable output
    pub config_fingerprint: Option<String>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self { use_colors: true, only_failures: false, config_fingerprint: None }
    }
}

/// Main report formatter that dispatches to specific formatters
pub struct ReportFormatter {
    options: ReportOptions,
}

impl ReportFormatter {
    /// Create a new report formatter with options
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    /// Format a validation report in one of the text formats
    pub fn format_report(
        &self,
        report: &ValidationReport,
        format: OutputFormat,
    ) -> CheckerResult<String> {
        let pruned;
        let shown = if self.options.only_failures {
            pruned = report.failures_only();
            &pruned
        } else {
            report
        };
        let summary = report.summary();

        match format {
            OutputFormat::Human => Ok(self.format_human(report.passed(), shown, &summary)),
            OutputFormat::Json => self.format_json(report.passed(), shown, &summary),
            OutputFormat::Junit => Ok(self.format_junit(shown, &summary)),
            OutputFormat::Pdf => {
                Err(CheckerError::render("PDF output is binary; render it with write_report"))
            }
        }
    }

    /// Render a validation report to bytes in any format
    pub fn render(&self, report: &ValidationReport, format: OutputFormat) -> CheckerResult<Vec<u8>> {
        if format != OutputFormat::Pdf {
            let mut text = self.format_report(report, format)?;
            if !text.ends_with('\n') {
                text.push('\n');
            }
            return Ok(text.into_bytes());
        }

        let shown = if self.options.only_failures { report.failures_only() } else { report.clone() };
        pdf::render(
            &shown,
            &report.summary(),
            report.passed(),
            self.options.config_fingerprint.as_deref(),
        )
    }

    /// Write a formatted report to a writer
    pub fn write_report<W: Write>(
        &self,
        report: &ValidationReport,
        format: OutputFormat,
        mut writer: W,
    ) -> CheckerResult<()> {
        let rendered = self.render(report, format)?;
        writer.write_all(&rendered)?;
        writer.flush()?;
        Ok(())
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.options.use_colors {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }

    /// Format report as an indented tree
    fn format_human(&self, passed: bool, report: &ValidationReport, summary: &ReportSummary) -> String {
        let mut output = String::new();

        if passed {
            output.push_str(&format!("✅ {}\n\n", self.paint("32", "All compliance checks passed")));
        } else {
            output.push_str(&format!("❌ {}\n\n", self.paint("31", "Compliance checks failed")));
        }

        self.write_human_node(&mut output, report, 0);
        output.push_str(&self.format_summary(summary));
        output
    }

    fn write_human_node(&self, output: &mut String, report: &ValidationReport, depth: usize) {
        let indent = "  ".repeat(depth);
        let mut child_depth = depth;

        if let Some(target) = &report.target {
            let icon = match target.kind {
                EntityKind::Domain => "📁",
                EntityKind::DataProduct => "📦",
                EntityKind::Dataset => "📄",
            };
            output.push_str(&format!("{}{} {}\n", indent, icon, self.paint("1", &target.to_string())));

            for result in &report.results {
                output.push_str(&format!("{}  {}\n", indent, self.format_result(result)));
            }
            child_depth += 1;
        }

        for child in &report.children {
            self.write_human_node(output, &child.report, child_depth);
        }

        if report.target.is_some() && depth == 0 {
            output.push('\n');
        }
    }

    fn format_result(&self, result: &ValidationResult) -> String {
        if result.passed {
            format!("{} {} {}", self.paint("32", "✔"), result.rule_id, self.paint("2", &result.message))
        } else {
            let color = match result.severity {
                Severity::Error => "31",
                Severity::Warning => "33",
                Severity::Info => "36",
            };
            format!(
                "{} {} [{}] {}",
                self.paint(color, "✘"),
                result.rule_id,
                self.paint(color, result.severity.as_str()),
                result.message
            )
        }
    }

    /// Format report in JSON format
    fn format_json(
        &self,
        passed: bool,
        report: &ValidationReport,
        summary: &ReportSummary,
    ) -> CheckerResult<String> {
        let json_report = serde_json::json!({
            "passed": passed,
            "generated_at": Utc::now().to_rfc3339(),
            "config_fingerprint": self.options.config_fingerprint,
            "summary": summary,
            "report": report,
        });

        serde_json::to_string_pretty(&json_report)
            .map_err(|e| CheckerError::render(format!("JSON serialization failed: {e}")))
    }

    /// Format report in JUnit XML format, one testsuite per checked entity
    fn format_junit(&self, report: &ValidationReport, summary: &ReportSummary) -> String {
        let mut xml = String::new();
        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str(&format!(
            "<testsuites name=\"datamesh-checker\" tests=\"{}\" failures=\"{}\">\n",
            summary.rules_evaluated,
            summary.failed()
        ));

        let mut path = Vec::new();
        write_junit_suites(&mut xml, report, &mut path);

        xml.push_str("</testsuites>\n");
        xml
    }

    /// Format the summary section
    fn format_summary(&self, summary: &ReportSummary) -> String {
        let entities = format!(
            "{} domain{}, {} data product{}, {} dataset{}",
            summary.entities.domains,
            plural(summary.entities.domains),
            summary.entities.data_products,
            plural(summary.entities.data_products),
            summary.entities.datasets,
            plural(summary.entities.datasets)
        );

        let mut parts = vec![self.paint("32", &format!("{} passed", summary.passed))];
        let failures = &summary.failures_by_severity;
        if failures.error > 0 {
            parts.push(self.paint("31", &format!("{} error{}", failures.error, plural(failures.error))));
        }
        if failures.warning > 0 {
            parts.push(
                self.paint("33", &format!("{} warning{}", failures.warning, plural(failures.warning))),
            );
        }
        if failures.info > 0 {
            parts.push(self.paint("36", &format!("{} info", failures.info)));
        }

        format!("📊 {} {} ({})\n", self.paint("1", "Summary:"), parts.join(", "), entities)
    }
}

impl Default for ReportFormatter {
    fn default() -> Self {
        Self::new(ReportOptions::default())
    }
}

fn write_junit_suites(xml: &mut String, report: &ValidationReport, path: &mut Vec<String>) {
    let pushed = match &report.target {
        Some(target) => {
            path.push(target.name.clone());
            let failures = report.results.iter().filter(|r| !r.passed).count();
            xml.push_str(&format!(
                "  <testsuite name=\"{}\" tests=\"{}\" failures=\"{}\">\n",
                escape_xml(&path.join("/")),
                report.results.len(),
                failures
            ));
            for result in &report.results {
                xml.push_str(&format!(
                    "    <testcase classname=\"{}\" name=\"{}\"",
                    escape_xml(&path.join(".")),
                    result.rule_id
                ));
                if result.passed {
                    xml.push_str("/>\n");
                } else {
                    xml.push_str(">\n");
                    xml.push_str(&format!(
                        "      <failure type=\"{}\" message=\"{}\"/>\n",
                        result.severity.as_str(),
                        escape_xml(&result.message)
                    ));
                    xml.push_str("    </testcase>\n");
                }
            }
            xml.push_str("  </testsuite>\n");
            true
        }
        None => false,
    };

    for child in &report.children {
        write_junit_suites(xml, &child.report, path);
    }

    if pushed {
        path.pop();
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

/// Escape XML special characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::descriptors::{Column, EntityRef};
    use crate::domain::results::{Attribute, RuleCategory};
    use serde_json::Value as JsonValue;

    fn create_test_report() -> ValidationReport {
        let domain_ref = EntityRef::new(EntityKind::Domain, "finance");
        let product_ref = EntityRef::new(EntityKind::DataProduct, "tax_Ledger");

        let mut product = ValidationReport::for_entity(product_ref.clone());
        product.add_result(ValidationResult::fail(
            "data_product_name_convention",
            product_ref.clone(),
            Severity::Error,
            RuleCategory::Naming,
            "Name 'tax_Ledger' must use lowercase words separated by underscores",
        ));
        product.add_result(ValidationResult::pass(
            "data_product_owner_present",
            product_ref,
            Severity::Error,
            RuleCategory::Metadata,
            "Owned by alice",
        ));

        let mut domain = ValidationReport::for_entity(domain_ref.clone());
        domain.add_result(ValidationResult::pass(
            "domain_owner_present",
            domain_ref,
            Severity::Error,
            RuleCategory::Metadata,
            "Owned by 'finance-team'",
        ));
        domain.add_child("tax_Ledger", product);

        let mut report = ValidationReport::new();
        report.add_child("finance", domain);
        report
    }

    fn plain() -> ReportFormatter {
        ReportFormatter::new(ReportOptions { use_colors: false, ..Default::default() })
    }

    #[test]
    fn test_human_format() {
        let output = plain().format_report(&create_test_report(), OutputFormat::Human).unwrap();

        assert!(output.contains("Compliance checks failed"));
        assert!(output.contains("📁 domain 'finance'"));
        assert!(output.contains("  📦 data product 'tax_Ledger'"));
        assert!(output.contains("✘ data_product_name_convention [error]"));
        assert!(output.contains("✔ domain_owner_present"));
        assert!(output.contains("Summary: 2 passed, 1 error (1 domain, 1 data product, 0 datasets)"));
    }

    #[test]
    fn test_only_failures_hides_passing_results() {
        let formatter = ReportFormatter::new(ReportOptions {
            use_colors: false,
            only_failures: true,
            ..Default::default()
        });
        let output = formatter.format_report(&create_test_report(), OutputFormat::Human).unwrap();

        assert!(output.contains("data_product_name_convention"));
        assert!(!output.contains("domain_owner_present"));
        // Summary still covers the full report
        assert!(output.contains("2 passed"));
    }

    #[test]
    fn test_json_format() {
        let formatter = ReportFormatter::new(ReportOptions {
            config_fingerprint: Some("abc123".to_string()),
            ..Default::default()
        });
        let output = formatter.format_report(&create_test_report(), OutputFormat::Json).unwrap();

        let json: JsonValue = serde_json::from_str(&output).unwrap();
        assert_eq!(json["passed"], false);
        assert_eq!(json["config_fingerprint"], "abc123");
        assert_eq!(json["summary"]["failures_by_severity"]["error"], 1);
        let domain = &json["report"]["children"][0];
        assert_eq!(domain["key"], "finance");
        assert_eq!(domain["report"]["children"][0]["report"]["results"][0]["passed"], false);
    }

    #[test]
    fn test_junit_format() {
        let output = plain().format_report(&create_test_report(), OutputFormat::Junit).unwrap();

        assert!(output.contains("<?xml version=\"1.0\""));
        assert!(output.contains("<testsuites name=\"datamesh-checker\" tests=\"3\" failures=\"1\">"));
        assert!(output.contains("<testsuite name=\"finance/tax_Ledger\" tests=\"2\" failures=\"1\">"));
        assert!(output.contains("<failure type=\"error\""));
        assert!(output.contains("name=\"domain_owner_present\"/>"));
    }

    #[test]
    fn test_empty_report_passes() {
        let output = plain().format_report(&ValidationReport::new(), OutputFormat::Human).unwrap();
        assert!(output.contains("All compliance checks passed"));
        assert!(output.contains("0 passed"));
    }

    #[test]
    fn test_pdf_report() {
        let mut report = create_test_report();
        let dataset_ref = EntityRef::new(EntityKind::Dataset, "entries");
        let mut dataset = ValidationReport::for_entity(dataset_ref.clone())
            .with_attributes(vec![Attribute::new("location", "s3://starburst/finance/entries")])
            .with_columns(vec![
                Column::new("amount", "decimal").with_description("Amount"),
                Column::new("booked_at", "timestamp"),
            ]);
        dataset.add_result(ValidationResult::fail(
            "dataset_columns_described",
            dataset_ref,
            Severity::Error,
            RuleCategory::Metadata,
            "Undescribed columns: booked_at",
        ));
        report.children[0].report.children[0].report.add_child("entries", dataset);

        let mut bytes = Vec::new();
        plain().write_report(&report, OutputFormat::Pdf, &mut bytes).unwrap();

        assert!(bytes.starts_with(b"%PDF"));
        assert!(plain().format_report(&report, OutputFormat::Pdf).is_err());
    }

    #[test]
    fn test_write_report_terminates_text_output() {
        let mut bytes = Vec::new();
        plain().write_report(&create_test_report(), OutputFormat::Json, &mut bytes).unwrap();

        let text = String::from_utf8(bytes).unwrap();
        assert!(text.ends_with("}\n"));
        assert!(serde_json::from_str::<JsonValue>(&text).is_ok());
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("pdf".parse::<OutputFormat>().unwrap(), OutputFormat::Pdf);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("sarif".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("<a & 'b'>"), "&lt;a &amp; &#39;b&#39;&gt;");
    }
}
