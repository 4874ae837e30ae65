//! Rules applied to dataset descriptors
//!
//! Dataset and column names are always checked as snake_case regardless of
//! the configured style, since they surface as SQL identifiers.

use super::naming::is_snake_case;
use super::{Outcome, Predicate, Rule, RuleContext};
use crate::domain::descriptors::{has_text, Dataset};
use crate::domain::results::{RuleCategory, Severity};

/// Dataset rules in declaration order
pub fn rules() -> Vec<Rule> {
    vec![
        Rule {
            id: "dataset_name_convention",
            category: RuleCategory::Naming,
            severity: Severity::Error,
            description: "Dataset name is snake_case",
            predicate: Predicate::Dataset(name_convention),
        },
        Rule {
            id: "dataset_description_present",
            category: RuleCategory::Metadata,
            severity: Severity::Error,
            description: "Dataset has a non-empty description",
            predicate: Predicate::Dataset(description_present),
        },
        Rule {
            id: "dataset_has_columns",
            category: RuleCategory::Structural,
            severity: Severity::Error,
            description: "Dataset declares at least one column",
            predicate: Predicate::Dataset(has_columns),
        },
        Rule {
            id: "dataset_columns_described",
            category: RuleCategory::Metadata,
            severity: Severity::Error,
            description: "Every dataset column has a description",
            predicate: Predicate::Dataset(columns_described),
        },
        Rule {
            id: "dataset_column_names_convention",
            category: RuleCategory::Naming,
            severity: Severity::Warning,
            description: "Dataset column names are snake_case",
            predicate: Predicate::Dataset(column_names_convention),
        },
        Rule {
            id: "dataset_location_present",
            category: RuleCategory::Structural,
            severity: Severity::Info,
            description: "Dataset declares its storage location",
            predicate: Predicate::Dataset(location_present),
        },
    ]
}

fn name_convention(dataset: &Dataset, _ctx: &RuleContext<'_>) -> Outcome {
    Outcome::check(
        is_snake_case(&dataset.name),
        format!("Name '{}' is snake_case", dataset.name),
        format!("Name '{}' must be lowercase words separated by underscores", dataset.name),
    )
}

fn description_present(dataset: &Dataset, _ctx: &RuleContext<'_>) -> Outcome {
    Outcome::check(
        has_text(dataset.description.as_deref()),
        "Description is present",
        "Description is missing or empty",
    )
}

fn has_columns(dataset: &Dataset, _ctx: &RuleContext<'_>) -> Outcome {
    let count = dataset.columns.len();
    Outcome::check(
        count > 0,
        format!("{} column{} declared", count, if count == 1 { "" } else { "s" }),
        "No column is declared",
    )
}

// An empty column list is reported by `dataset_has_columns`, not here
fn columns_described(dataset: &Dataset, _ctx: &RuleContext<'_>) -> Outcome {
    let undocumented: Vec<&str> = dataset
        .columns
        .iter()
        .filter(|c| !c.is_described())
        .map(|c| c.name.as_str())
        .collect();

    Outcome::check(
        undocumented.is_empty(),
        "All columns are described",
        format!("Columns without description: {}", undocumented.join(", ")),
    )
}

fn column_names_convention(dataset: &Dataset, _ctx: &RuleContext<'_>) -> Outcome {
    let offenders: Vec<&str> = dataset
        .columns
        .iter()
        .filter(|c| !is_snake_case(&c.name))
        .map(|c| c.name.as_str())
        .collect();

    Outcome::check(
        offenders.is_empty(),
        "Column names are snake_case",
        format!("Column names not in snake_case: {}", offenders.join(", ")),
    )
}

fn location_present(dataset: &Dataset, _ctx: &RuleContext<'_>) -> Outcome {
    match dataset.location.as_deref().map(str::trim) {
        Some(location) if !location.is_empty() => Outcome::pass(format!("Stored at '{location}'")),
        _ => Outcome::fail("Storage location is missing"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CheckerConfig;
    use crate::domain::descriptors::Column;
    use crate::rules::RuleSet;

    fn failing_rules(dataset: &Dataset) -> Vec<String> {
        let config = CheckerConfig::default();
        RuleSet::builtin()
            .evaluate_dataset(dataset, &RuleContext::new(&config))
            .into_iter()
            .filter(|r| !r.passed)
            .map(|r| r.rule_id)
            .collect()
    }

    fn compliant() -> Dataset {
        Dataset::new("monthly_revenue")
            .with_description("Revenue by month")
            .with_location("s3://starburst/finance/monthly_revenue")
            .with_column(Column::new("month", "date").with_description("Month"))
            .with_column(Column::new("revenue", "decimal").with_description("Revenue in EUR"))
    }

    #[test]
    fn test_compliant_dataset_passes() {
        assert!(failing_rules(&compliant()).is_empty());
    }

    #[test]
    fn test_dataset_without_columns() {
        let mut dataset = compliant();
        dataset.columns.clear();
        assert_eq!(failing_rules(&dataset), vec!["dataset_has_columns"]);
    }

    #[test]
    fn test_undocumented_columns_are_named() {
        let dataset = compliant()
            .with_column(Column::new("region", "varchar"))
            .with_column(Column::new("Channel", "varchar").with_description(" "));

        let config = CheckerConfig::default();
        let results = RuleSet::builtin().evaluate_dataset(&dataset, &RuleContext::new(&config));
        let described = results.iter().find(|r| r.rule_id == "dataset_columns_described").unwrap();

        assert!(!described.passed);
        assert_eq!(described.message, "Columns without description: region, Channel");
        assert_eq!(
            failing_rules(&dataset),
            vec!["dataset_columns_described", "dataset_column_names_convention"]
        );
    }

    #[test]
    fn test_camel_case_dataset_name_fails() {
        let mut dataset = compliant();
        dataset.name = "MonthlyRevenue".to_string();
        assert_eq!(failing_rules(&dataset), vec!["dataset_name_convention"]);
    }

    #[test]
    fn test_missing_location_is_informational() {
        let mut dataset = compliant();
        dataset.location = None;

        let config = CheckerConfig::default();
        let results = RuleSet::builtin().evaluate_dataset(&dataset, &RuleContext::new(&config));
        let location = results.iter().find(|r| r.rule_id == "dataset_location_present").unwrap();
        assert!(!location.passed);
        assert_eq!(location.severity, Severity::Info);
    }
}
