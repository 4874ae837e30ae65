//! Rule registry for governance checks
//!
//! Architectural Principle: Service Layer - The rule set evaluates descriptors without knowing about the catalog
//! - Each rule is a named, pure predicate tagged with the entity type it applies to
//! - Rules are independent; one failure never short-circuits the others
//! - A predicate that panics is degraded to a failing result instead of aborting the check

pub mod data_product;
pub mod dataset;
pub mod domain;
pub mod naming;

use crate::config::{CheckerConfig, NamingPolicy};
use crate::domain::descriptors::{DataProduct, Dataset, Domain, EntityKind, EntityRef};
use crate::domain::results::{RuleCategory, Severity, ValidationResult};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Pass/fail verdict with its explanation, produced by a predicate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub passed: bool,
    pub message: String,
}

impl Outcome {
    pub fn pass(message: impl Into<String>) -> Self {
        Self { passed: true, message: message.into() }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self { passed: false, message: message.into() }
    }

    /// Pick between two messages depending on `passed`
    pub fn check(passed: bool, ok: impl Into<String>, failure: impl Into<String>) -> Self {
        if passed {
            Self::pass(ok)
        } else {
            Self::fail(failure)
        }
    }
}

/// Read-only inputs a predicate may consult besides the entity itself
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// Rule parameters
    pub config: &'a CheckerConfig,
    /// Domain the evaluated product belongs to, when known
    pub domain: Option<&'a Domain>,
    /// Data product the evaluated dataset belongs to, when known
    pub data_product: Option<&'a DataProduct>,
}

impl<'a> RuleContext<'a> {
    pub fn new(config: &'a CheckerConfig) -> Self {
        Self { config, domain: None, data_product: None }
    }

    pub fn with_domain(mut self, domain: &'a Domain) -> Self {
        self.domain = Some(domain);
        self
    }

    pub fn with_data_product(mut self, data_product: &'a DataProduct) -> Self {
        self.data_product = Some(data_product);
        self
    }
}

pub type DomainPredicate = fn(&Domain, &RuleContext<'_>) -> Outcome;
pub type DataProductPredicate = fn(&DataProduct, &RuleContext<'_>) -> Outcome;
pub type DatasetPredicate = fn(&Dataset, &RuleContext<'_>) -> Outcome;

/// Predicate tagged with the entity type it evaluates
#[derive(Clone, Copy)]
pub enum Predicate {
    Domain(DomainPredicate),
    DataProduct(DataProductPredicate),
    Dataset(DatasetPredicate),
}

impl Predicate {
    pub fn entity_kind(&self) -> EntityKind {
        match self {
            Self::Domain(_) => EntityKind::Domain,
            Self::DataProduct(_) => EntityKind::DataProduct,
            Self::Dataset(_) => EntityKind::Dataset,
        }
    }
}

/// A named governance rule
#[derive(Clone)]
pub struct Rule {
    /// Unique identifier, used as the result's rule name
    pub id: &'static str,
    pub category: RuleCategory,
    pub severity: Severity,
    /// One-line explanation shown by `rules` and `explain`
    pub description: &'static str,
    pub predicate: Predicate,
}

impl Rule {
    pub fn entity_kind(&self) -> EntityKind {
        self.predicate.entity_kind()
    }

    fn result(&self, target: EntityRef, outcome: Outcome) -> ValidationResult {
        if outcome.passed {
            ValidationResult::pass(self.id, target, self.severity, self.category, outcome.message)
        } else {
            ValidationResult::fail(self.id, target, self.severity, self.category, outcome.message)
        }
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("entity", &self.entity_kind())
            .field("category", &self.category)
            .field("severity", &self.severity)
            .finish()
    }
}

/// Statistics about the registered rules
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleStats {
    pub domain_rules: usize,
    pub data_product_rules: usize,
    pub dataset_rules: usize,
}

impl RuleStats {
    pub fn total(&self) -> usize {
        self.domain_rules + self.data_product_rules + self.dataset_rules
    }
}

/// Ordered, immutable collection of rules
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// The built-in governance rules, in declaration order
    pub fn builtin() -> Self {
        let mut rules = Vec::new();
        rules.extend(domain::rules());
        rules.extend(data_product::rules());
        rules.extend(dataset::rules());
        Self { rules }
    }

    /// Build a rule set from explicit rules, keeping their order
    pub fn from_rules(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Copy of this set without the rule named `id`
    pub fn without(mut self, id: &str) -> Self {
        self.rules.retain(|r| r.id != id);
        self
    }

    /// All rules in declaration order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Rules applying to one entity type, in declaration order
    pub fn rules_for(&self, kind: EntityKind) -> impl Iterator<Item = &Rule> {
        self.rules.iter().filter(move |r| r.entity_kind() == kind)
    }

    /// Look up a rule by id
    pub fn find(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }

    pub fn stats(&self) -> RuleStats {
        let mut stats = RuleStats::default();
        for rule in &self.rules {
            match rule.entity_kind() {
                EntityKind::Domain => stats.domain_rules += 1,
                EntityKind::DataProduct => stats.data_product_rules += 1,
                EntityKind::Dataset => stats.dataset_rules += 1,
            }
        }
        stats
    }

    /// Evaluate every domain rule against `domain`
    pub fn evaluate_domain(&self, domain: &Domain, ctx: &RuleContext<'_>) -> Vec<ValidationResult> {
        let target = domain.entity_ref();
        self.rules
            .iter()
            .filter_map(|rule| match rule.predicate {
                Predicate::Domain(check) => {
                    Some(evaluate_guarded(rule, &target, || check(domain, ctx)))
                }
                _ => None,
            })
            .collect()
    }

    /// Evaluate every data product rule against `product`
    pub fn evaluate_data_product(
        &self,
        product: &DataProduct,
        ctx: &RuleContext<'_>,
    ) -> Vec<ValidationResult> {
        let target = product.entity_ref();
        self.rules
            .iter()
            .filter_map(|rule| match rule.predicate {
                Predicate::DataProduct(check) => {
                    Some(evaluate_guarded(rule, &target, || check(product, ctx)))
                }
                _ => None,
            })
            .collect()
    }

    /// Evaluate every dataset rule against `dataset`
    pub fn evaluate_dataset(&self, dataset: &Dataset, ctx: &RuleContext<'_>) -> Vec<ValidationResult> {
        let target = dataset.entity_ref();
        self.rules
            .iter()
            .filter_map(|rule| match rule.predicate {
                Predicate::Dataset(check) => {
                    Some(evaluate_guarded(rule, &target, || check(dataset, ctx)))
                }
                _ => None,
            })
            .collect()
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::builtin()
    }
}

fn evaluate_guarded<F>(rule: &Rule, target: &EntityRef, check: F) -> ValidationResult
where
    F: FnOnce() -> Outcome,
{
    let outcome = match panic::catch_unwind(AssertUnwindSafe(check)) {
        Ok(outcome) => outcome,
        Err(payload) => {
            let reason = panic_message(payload.as_ref());
            tracing::warn!("Rule '{}' could not evaluate {}: {}", rule.id, target, reason);
            Outcome::fail(format!("Rule could not be evaluated: {reason}"))
        }
    };

    tracing::debug!(
        "Rule '{}' on {}: {}",
        rule.id,
        target,
        if outcome.passed { "pass" } else { "fail" }
    );
    rule.result(target.clone(), outcome)
}

/// Shared length check for entity names
pub(crate) fn check_length(name: &str, policy: &NamingPolicy) -> Outcome {
    let length = name.chars().count();
    Outcome::check(
        (policy.min_length..=policy.max_length).contains(&length),
        format!("Name length {length} is within {}..={}", policy.min_length, policy.max_length),
        format!(
            "Name '{}' is {} characters long, expected between {} and {}",
            name, length, policy.min_length, policy.max_length
        ),
    )
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown error".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exploding(_: &Dataset, _: &RuleContext<'_>) -> Outcome {
        panic!("column list corrupted")
    }

    fn always_pass(_: &Dataset, _: &RuleContext<'_>) -> Outcome {
        Outcome::pass("fine")
    }

    #[test]
    fn test_builtin_rules_have_unique_ids() {
        let rules = RuleSet::builtin();
        for rule in rules.rules() {
            assert_eq!(rules.rules().iter().filter(|r| r.id == rule.id).count(), 1, "{}", rule.id);
        }
    }

    #[test]
    fn test_builtin_stats() {
        let stats = RuleSet::builtin().stats();
        assert_eq!(stats.domain_rules, 5);
        assert_eq!(stats.data_product_rules, 9);
        assert_eq!(stats.dataset_rules, 6);
        assert_eq!(stats.total(), 20);
    }

    #[test]
    fn test_rules_for_keeps_declaration_order() {
        let rules = RuleSet::builtin();
        let ids: Vec<_> = rules.rules_for(EntityKind::Domain).map(|r| r.id).collect();
        assert_eq!(
            ids,
            vec![
                "domain_name_convention",
                "domain_name_length",
                "domain_owner_present",
                "domain_description_present",
                "domain_schema_location",
            ]
        );
    }

    #[test]
    fn test_panicking_rule_degrades_to_failure() {
        let rules = RuleSet::from_rules(vec![
            Rule {
                id: "exploding",
                category: RuleCategory::Structural,
                severity: Severity::Error,
                description: "always panics",
                predicate: Predicate::Dataset(exploding),
            },
            Rule {
                id: "always_pass",
                category: RuleCategory::Metadata,
                severity: Severity::Info,
                description: "always passes",
                predicate: Predicate::Dataset(always_pass),
            },
        ]);
        let config = CheckerConfig::default();

        let results = rules.evaluate_dataset(&Dataset::new("orders"), &RuleContext::new(&config));

        assert_eq!(results.len(), 2);
        assert!(!results[0].passed);
        assert!(results[0].message.contains("column list corrupted"));
        assert!(results[1].passed);
    }

    #[test]
    fn test_without_removes_rule() {
        let rules = RuleSet::builtin().without("dataset_location_present");
        assert!(rules.find("dataset_location_present").is_none());
        assert_eq!(rules.stats().dataset_rules, 5);
    }
}
