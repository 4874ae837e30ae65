//! Rules applied to domain descriptors

use super::naming::{follows_style, style_hint, to_snake_case};
use super::{Outcome, Predicate, Rule, RuleContext};
use crate::domain::descriptors::{has_text, Domain};
use crate::domain::results::{RuleCategory, Severity};

/// Domain rules in declaration order
pub fn rules() -> Vec<Rule> {
    vec![
        Rule {
            id: "domain_name_convention",
            category: RuleCategory::Naming,
            severity: Severity::Error,
            description: "Domain name follows the configured naming style",
            predicate: Predicate::Domain(name_convention),
        },
        Rule {
            id: "domain_name_length",
            category: RuleCategory::Naming,
            severity: Severity::Error,
            description: "Domain name length is within the configured bounds",
            predicate: Predicate::Domain(name_length),
        },
        Rule {
            id: "domain_owner_present",
            category: RuleCategory::Metadata,
            severity: Severity::Error,
            description: "Domain declares an owner",
            predicate: Predicate::Domain(owner_present),
        },
        Rule {
            id: "domain_description_present",
            category: RuleCategory::Metadata,
            severity: Severity::Error,
            description: "Domain has a non-empty description",
            predicate: Predicate::Domain(description_present),
        },
        Rule {
            id: "domain_schema_location",
            category: RuleCategory::Structural,
            severity: Severity::Warning,
            description: "Domain schema location is '<prefix><snake_case domain name>'",
            predicate: Predicate::Domain(schema_location),
        },
    ]
}

fn name_convention(domain: &Domain, ctx: &RuleContext<'_>) -> Outcome {
    let style = ctx.config.naming.style;
    Outcome::check(
        follows_style(&domain.name, style),
        format!("Name '{}' follows {}", domain.name, style.as_str()),
        format!("Name '{}' must use {}", domain.name, style_hint(style)),
    )
}

fn name_length(domain: &Domain, ctx: &RuleContext<'_>) -> Outcome {
    super::check_length(&domain.name, &ctx.config.naming)
}

fn owner_present(domain: &Domain, _ctx: &RuleContext<'_>) -> Outcome {
    match domain.owner.as_deref() {
        Some(owner) if has_text(Some(owner)) => Outcome::pass(format!("Owned by '{}'", owner.trim())),
        _ => Outcome::fail("Owner is missing"),
    }
}

fn description_present(domain: &Domain, _ctx: &RuleContext<'_>) -> Outcome {
    Outcome::check(
        has_text(domain.description.as_deref()),
        "Description is present",
        "Description is missing or empty",
    )
}

fn schema_location(domain: &Domain, ctx: &RuleContext<'_>) -> Outcome {
    let prefix = ctx.config.metadata.schema_location_prefix.as_str();
    let expected = format!("{}{}", prefix, to_snake_case(&domain.name));

    match domain.schema_location.as_deref().map(str::trim) {
        None | Some("") => Outcome::fail(format!("Schema location is missing, expected '{expected}'")),
        Some(location) => Outcome::check(
            location
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with(&to_snake_case(&domain.name))),
            format!("Schema location '{location}' matches the domain"),
            format!("Schema location '{location}' should start with '{expected}'"),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CheckerConfig, ConfigBuilder, NamingStyle};
    use crate::rules::RuleSet;

    fn compliant() -> Domain {
        Domain::new("finance")
            .with_owner("finance-team")
            .with_description("Finance domain")
            .with_schema_location("s3://starburst/finance")
    }

    fn failing_rules(domain: &Domain, config: &CheckerConfig) -> Vec<String> {
        RuleSet::builtin()
            .evaluate_domain(domain, &RuleContext::new(config))
            .into_iter()
            .filter(|r| !r.passed)
            .map(|r| r.rule_id)
            .collect()
    }

    #[test]
    fn test_compliant_domain_passes_everything() {
        assert!(failing_rules(&compliant(), &CheckerConfig::default()).is_empty());
    }

    #[test]
    fn test_missing_owner_fails_only_owner_rule() {
        let mut domain = compliant();
        domain.owner = Some("  ".to_string());

        assert_eq!(failing_rules(&domain, &CheckerConfig::default()), vec!["domain_owner_present"]);
    }

    #[test]
    fn test_schema_location_uses_snake_case_name() {
        let config = ConfigBuilder::new().naming_style(NamingStyle::TitleWords).build().unwrap();
        let domain = Domain::new("Financial Reports")
            .with_owner("team")
            .with_description("desc")
            .with_schema_location("s3://starburst/financial_reports/v1");

        assert!(failing_rules(&domain, &config).is_empty());

        let moved = domain.clone().with_schema_location("s3://other/financial_reports");
        assert_eq!(failing_rules(&moved, &config), vec!["domain_schema_location"]);
    }

    #[test]
    fn test_missing_schema_location_reports_expectation() {
        let mut domain = compliant();
        domain.schema_location = None;
        let config = CheckerConfig::default();

        let results = RuleSet::builtin().evaluate_domain(&domain, &RuleContext::new(&config));
        let location = results.iter().find(|r| r.rule_id == "domain_schema_location").unwrap();
        assert!(!location.passed);
        assert!(location.message.contains("s3://starburst/finance"));
    }

    #[test]
    fn test_bad_name_fails_convention_and_length_independently() {
        let mut domain = compliant();
        domain.name = "FI".to_string();
        domain.schema_location = Some("s3://starburst/f_i".to_string());

        assert_eq!(
            failing_rules(&domain, &CheckerConfig::default()),
            vec!["domain_name_convention", "domain_name_length"]
        );
    }
}
