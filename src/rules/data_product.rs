//! Rules applied to data product descriptors

use super::naming::{follows_style, style_hint};
use super::{Outcome, Predicate, Rule, RuleContext};
use crate::domain::descriptors::{has_text, DataProduct};
use crate::domain::results::{RuleCategory, Severity};

/// Data product rules in declaration order
pub fn rules() -> Vec<Rule> {
    vec![
        Rule {
            id: "data_product_name_convention",
            category: RuleCategory::Naming,
            severity: Severity::Error,
            description: "Data product name follows the configured naming style",
            predicate: Predicate::DataProduct(name_convention),
        },
        Rule {
            id: "data_product_name_length",
            category: RuleCategory::Naming,
            severity: Severity::Error,
            description: "Data product name length is within the configured bounds",
            predicate: Predicate::DataProduct(name_length),
        },
        Rule {
            id: "data_product_owner_present",
            category: RuleCategory::Metadata,
            severity: Severity::Error,
            description: "Data product declares at least one owner",
            predicate: Predicate::DataProduct(owner_present),
        },
        Rule {
            id: "data_product_description_present",
            category: RuleCategory::Metadata,
            severity: Severity::Error,
            description: "Data product has a non-empty summary",
            predicate: Predicate::DataProduct(description_present),
        },
        Rule {
            id: "data_product_domain_registered",
            category: RuleCategory::Structural,
            severity: Severity::Error,
            description: "Data product belongs to a registered domain that lists it",
            predicate: Predicate::DataProduct(domain_registered),
        },
        Rule {
            id: "data_product_catalog_allowed",
            category: RuleCategory::Structural,
            severity: Severity::Error,
            description: "Data product is published to one of the allowed catalogs",
            predicate: Predicate::DataProduct(catalog_allowed),
        },
        Rule {
            id: "data_product_tags_present",
            category: RuleCategory::Metadata,
            severity: Severity::Warning,
            description: "Data product carries at least one tag",
            predicate: Predicate::DataProduct(tags_present),
        },
        Rule {
            id: "data_product_has_datasets",
            category: RuleCategory::Structural,
            severity: Severity::Error,
            description: "Data product publishes at least one dataset",
            predicate: Predicate::DataProduct(has_datasets),
        },
        Rule {
            id: "data_product_no_materialized_views",
            category: RuleCategory::Structural,
            severity: Severity::Error,
            description: "Data product publishes views only, no materialized views",
            predicate: Predicate::DataProduct(no_materialized_views),
        },
    ]
}

fn name_convention(product: &DataProduct, ctx: &RuleContext<'_>) -> Outcome {
    let style = ctx.config.naming.style;
    Outcome::check(
        follows_style(&product.name, style),
        format!("Name '{}' follows {}", product.name, style.as_str()),
        format!("Name '{}' must use {}", product.name, style_hint(style)),
    )
}

fn name_length(product: &DataProduct, ctx: &RuleContext<'_>) -> Outcome {
    super::check_length(&product.name, &ctx.config.naming)
}

fn owner_present(product: &DataProduct, _ctx: &RuleContext<'_>) -> Outcome {
    let owners: Vec<&str> =
        product.owners.iter().map(|o| o.trim()).filter(|o| !o.is_empty()).collect();
    Outcome::check(
        !owners.is_empty(),
        format!("Owned by {}", owners.join(", ")),
        "No owner is declared",
    )
}

fn description_present(product: &DataProduct, _ctx: &RuleContext<'_>) -> Outcome {
    Outcome::check(
        has_text(product.description.as_deref()),
        "Summary is present",
        "Summary is missing or empty",
    )
}

fn domain_registered(product: &DataProduct, ctx: &RuleContext<'_>) -> Outcome {
    if product.domain.trim().is_empty() {
        return Outcome::fail("Data product does not reference a domain");
    }

    match ctx.domain {
        None => Outcome::fail(format!(
            "Domain '{}' could not be confirmed in the catalog",
            product.domain
        )),
        Some(domain) if domain.name != product.domain => Outcome::fail(format!(
            "Data product references domain '{}' but is registered under '{}'",
            product.domain, domain.name
        )),
        Some(domain) if !domain.lists_data_product(&product.name) => Outcome::fail(format!(
            "Domain '{}' does not list data product '{}'",
            domain.name, product.name
        )),
        Some(domain) => Outcome::pass(format!("Registered in domain '{}'", domain.name)),
    }
}

fn catalog_allowed(product: &DataProduct, ctx: &RuleContext<'_>) -> Outcome {
    let allowed = &ctx.config.metadata.allowed_catalogs;
    match product.catalog_name.as_deref().map(str::trim) {
        None | Some("") => Outcome::fail("Catalog name is missing"),
        Some(catalog) => Outcome::check(
            allowed.iter().any(|a| a == catalog),
            format!("Published to catalog '{catalog}'"),
            format!("Catalog '{}' is not one of: {}", catalog, allowed.join(", ")),
        ),
    }
}

fn tags_present(product: &DataProduct, _ctx: &RuleContext<'_>) -> Outcome {
    let tags: Vec<&str> =
        product.tags.iter().map(|t| t.trim()).filter(|t| !t.is_empty()).collect();
    Outcome::check(!tags.is_empty(), format!("Tagged {}", tags.join(", ")), "No tag is set")
}

fn has_datasets(product: &DataProduct, _ctx: &RuleContext<'_>) -> Outcome {
    let count = product.datasets.len();
    Outcome::check(
        count > 0,
        format!("{} dataset{} published", count, if count == 1 { "" } else { "s" }),
        "No dataset is published",
    )
}

fn no_materialized_views(product: &DataProduct, _ctx: &RuleContext<'_>) -> Outcome {
    Outcome::check(
        product.materialized_views.is_empty(),
        "No materialized views",
        format!("Materialized views detected: {}", product.materialized_views.join(", ")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CheckerConfig, ConfigBuilder};
    use crate::domain::descriptors::{Column, Dataset, Domain};
    use crate::rules::RuleSet;

    fn domain() -> Domain {
        Domain::new("finance").with_data_product("financial_reports")
    }

    fn compliant() -> DataProduct {
        DataProduct::new("financial_reports", "finance")
            .with_owner("alice")
            .with_description("Monthly reports")
            .with_catalog("minio")
            .with_tag("gold")
            .with_dataset(
                Dataset::new("monthly_revenue")
                    .with_column(Column::new("month", "date").with_description("Month")),
            )
    }

    fn failing_rules(product: &DataProduct, domain: Option<&Domain>, config: &CheckerConfig) -> Vec<String> {
        let mut ctx = RuleContext::new(config);
        if let Some(domain) = domain {
            ctx = ctx.with_domain(domain);
        }
        RuleSet::builtin()
            .evaluate_data_product(product, &ctx)
            .into_iter()
            .filter(|r| !r.passed)
            .map(|r| r.rule_id)
            .collect()
    }

    #[test]
    fn test_compliant_product_passes() {
        let domain = domain();
        assert!(failing_rules(&compliant(), Some(&domain), &CheckerConfig::default()).is_empty());
    }

    #[test]
    fn test_tags_message_skips_blank_tags() {
        let product = compliant().with_tag(" ");
        let outcome = tags_present(&product, &RuleContext::new(&CheckerConfig::default()));

        assert!(outcome.passed);
        assert_eq!(outcome.message, "Tagged gold");
    }

    #[test]
    fn test_uppercase_name_fails_naming_only() {
        let domain = Domain::new("finance").with_data_product("Tax_Ledger");
        let mut product = compliant();
        product.name = "Tax_Ledger".to_string();

        assert_eq!(
            failing_rules(&product, Some(&domain), &CheckerConfig::default()),
            vec!["data_product_name_convention"]
        );
    }

    #[test]
    fn test_unlisted_or_unknown_domain_fails_registration() {
        let other = Domain::new("finance");
        assert_eq!(
            failing_rules(&compliant(), Some(&other), &CheckerConfig::default()),
            vec!["data_product_domain_registered"]
        );
        assert_eq!(
            failing_rules(&compliant(), None, &CheckerConfig::default()),
            vec!["data_product_domain_registered"]
        );
    }

    #[test]
    fn test_catalog_must_be_allowed() {
        let domain = domain();
        let config = ConfigBuilder::new().allowed_catalogs(["hive"]).build().unwrap();
        assert_eq!(
            failing_rules(&compliant(), Some(&domain), &config),
            vec!["data_product_catalog_allowed"]
        );

        let mut product = compliant();
        product.catalog_name = None;
        assert_eq!(
            failing_rules(&product, Some(&domain), &CheckerConfig::default()),
            vec!["data_product_catalog_allowed"]
        );
    }

    #[test]
    fn test_empty_product_fails_every_metadata_rule() {
        let domain = Domain::new("finance").with_data_product("bare_product");
        let product = DataProduct::new("bare_product", "finance")
            .with_catalog("minio")
            .with_materialized_view("daily_totals");

        assert_eq!(
            failing_rules(&product, Some(&domain), &CheckerConfig::default()),
            vec![
                "data_product_owner_present",
                "data_product_description_present",
                "data_product_tags_present",
                "data_product_has_datasets",
                "data_product_no_materialized_views",
            ]
        );
    }

    #[test]
    fn test_materialized_view_message_names_views() {
        let domain = domain();
        let product = compliant().with_materialized_view("daily_totals");
        let config = CheckerConfig::default();
        let ctx = RuleContext::new(&config).with_domain(&domain);

        let results = RuleSet::builtin().evaluate_data_product(&product, &ctx);
        let result = results.iter().find(|r| r.rule_id == "data_product_no_materialized_views").unwrap();
        assert!(!result.passed);
        assert!(result.message.contains("daily_totals"));
    }
}
