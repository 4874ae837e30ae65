//! Datamesh Checker - Governance compliance checks for data-mesh catalogs
//!
//! Architecture: Clean Architecture - Library interface serves as the application layer
//! - Pure rule evaluation separated from catalog access
//! - The checker consumes descriptors through the `DescriptorProvider` port
//! - Reports are plain data owned by the caller, rendered by the report module

pub mod catalog;
pub mod checker;
pub mod config;
pub mod domain;
pub mod report;
pub mod rules;

// Re-export main types for convenient access
pub use domain::descriptors::{Column, DataProduct, Dataset, Domain, EntityKind, EntityRef};
pub use domain::results::{
    Attribute, CheckerError, CheckerResult, ReportSummary, RuleCategory, Severity,
    ValidationReport, ValidationResult,
};

pub use catalog::{CatalogBuilder, DescriptorProvider, InMemoryCatalog, SnapshotCatalog};

pub use checker::{Checker, CheckerOptions};

pub use config::{CheckerConfig, ConfigBuilder, NamingStyle, RunScope};

pub use report::{OutputFormat, ReportFormatter, ReportOptions};

pub use rules::{Rule, RuleSet};

use std::path::Path;

/// Convenience function to check every in-scope domain of a catalog snapshot
pub fn check_snapshot<P: AsRef<Path>>(
    snapshot: P,
    config: CheckerConfig,
) -> CheckerResult<ValidationReport> {
    let checker = Checker::with_config(SnapshotCatalog::new(snapshot), config)?;
    checker.run_checks()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const CATALOG: &str = r#"
domains:
  - name: finance
    owner: finance-team
    description: Finance domain
    schema_location: s3://starburst/finance
    data_products:
      - name: financial_reports
        owners: [alice]
        description: Monthly reports
        catalog_name: minio
        tags: [gold]
        datasets:
          - name: monthly_revenue
            description: Revenue by month
            location: s3://starburst/finance/monthly_revenue
            columns:
              - { name: month, type: date, description: Month }
"#;

    #[test]
    fn test_check_snapshot_passes_compliant_catalog() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("catalog.yaml");
        fs::write(&file, CATALOG).unwrap();

        let report = check_snapshot(&file, CheckerConfig::default()).unwrap();
        assert!(report.passed());
        assert_eq!(report.summary().entities.total(), 3);
    }

    #[test]
    fn test_check_snapshot_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = check_snapshot(temp_dir.path().join("none.yaml"), CheckerConfig::default())
            .unwrap_err();
        assert!(matches!(err, CheckerError::ProviderUnavailable { .. }));
    }

    #[test]
    fn test_title_words_style_from_config() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("catalog.yaml");
        fs::write(&file, CATALOG.replace("name: finance\n", "name: Finance\n")).unwrap();

        let config = ConfigBuilder::new().naming_style(NamingStyle::TitleWords).build().unwrap();
        let report = check_snapshot(&file, config).unwrap();

        let finance = report.child("Finance").unwrap();
        assert!(finance.results.iter().all(|r| r.passed));
        // Product names are checked with the same style
        let product = finance.child("financial_reports").unwrap();
        assert_eq!(product.failures()[0].rule_id, "data_product_name_convention");
    }
}
