//! Main check orchestrator for the datamesh checker
//!
//! CDD Principle: Domain Services - Checker orchestrates catalog validation workflows
//! - Fetches descriptors through the provider port, one fresh fetch per call
//! - Applies the rule set per entity and assembles ordered, keyed reports
//! - Missing entities and provider failures abort the whole check, bulk checks included

use crate::catalog::DescriptorProvider;
use crate::config::CheckerConfig;
use crate::domain::descriptors::{DataProduct, Dataset, Domain};
use crate::domain::results::{CheckerResult, ValidationReport};
use crate::rules::{RuleContext, RuleSet, RuleStats};
use rayon::prelude::*;

/// Options for customizing check behavior
#[derive(Debug, Clone, Default)]
pub struct CheckerOptions {
    /// Check independent entities of bulk checks in parallel
    pub parallel: bool,
}

/// Single entry point for catalog compliance checks
///
/// Holds no state besides its provider, rules and configuration; every call
/// fetches what it needs and nothing is cached between calls.
pub struct Checker<P> {
    provider: P,
    rules: RuleSet,
    config: CheckerConfig,
    options: CheckerOptions,
}

impl<P: DescriptorProvider> Checker<P> {
    /// Create a checker with the built-in rules and default configuration
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            rules: RuleSet::builtin(),
            config: CheckerConfig::default(),
            options: CheckerOptions::default(),
        }
    }

    /// Create a checker with an explicit configuration
    pub fn with_config(provider: P, config: CheckerConfig) -> CheckerResult<Self> {
        config.validate()?;
        Ok(Self { config, ..Self::new(provider) })
    }

    /// Replace the rule set
    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// Set check options
    pub fn with_options(mut self, options: CheckerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// Statistics about the registered rules
    pub fn rule_stats(&self) -> RuleStats {
        self.rules.stats()
    }

    /// Check one domain by name
    pub fn check_domain(&self, name: &str) -> CheckerResult<ValidationReport> {
        tracing::info!("Checking domain '{}'", name);
        let domain = self.provider.get_domain(name)?;
        Ok(self.check_domain_descriptor(&domain))
    }

    /// Apply the domain rules to an already fetched domain
    pub fn check_domain_descriptor(&self, domain: &Domain) -> ValidationReport {
        let ctx = RuleContext::new(&self.config);
        let mut report =
            ValidationReport::for_entity(domain.entity_ref()).with_attributes(domain.attributes());
        for result in self.rules.evaluate_domain(domain, &ctx) {
            report.add_result(result);
        }
        report
    }

    /// Check one named data product of a domain
    pub fn check_domain_data_product(
        &self,
        domain_name: &str,
        product_name: &str,
    ) -> CheckerResult<ValidationReport> {
        tracing::info!("Checking data product '{}/{}'", domain_name, product_name);
        let domain = self.provider.get_domain(domain_name)?;
        let product = self.provider.get_data_product(domain_name, product_name)?;
        Ok(self.check_data_product(&domain, &product))
    }

    /// Apply the data product rules to already fetched descriptors
    pub fn check_data_product(&self, domain: &Domain, product: &DataProduct) -> ValidationReport {
        let ctx = RuleContext::new(&self.config).with_domain(domain);
        let mut report =
            ValidationReport::for_entity(product.entity_ref()).with_attributes(product.attributes());
        for result in self.rules.evaluate_data_product(product, &ctx) {
            report.add_result(result);
        }
        report
    }

    /// Check every data product of a domain, keyed by product name in catalog order
    pub fn check_domain_all_data_products(
        &self,
        domain_name: &str,
    ) -> CheckerResult<ValidationReport> {
        tracing::info!("Checking all data products of domain '{}'", domain_name);
        let domain = self.provider.get_domain(domain_name)?;
        let names = self.provider.list_data_products(domain_name)?;

        let reports = self.map_ordered(&names, |name| {
            let product = self.provider.get_data_product(domain_name, name)?;
            Ok(self.check_data_product(&domain, &product))
        })?;

        Ok(keyed(names, reports))
    }

    /// Check every dataset of an already fetched data product, keyed by dataset name
    pub fn check_data_product_all_datasets(
        &self,
        product: &DataProduct,
    ) -> CheckerResult<ValidationReport> {
        tracing::info!("Checking datasets of data product '{}'", product.name);
        let datasets = self.provider.list_datasets(product)?;

        let reports =
            self.map_ordered(&datasets, |dataset| Ok(self.check_dataset(product, dataset)))?;

        let names = datasets.into_iter().map(|d| d.name).collect();
        Ok(keyed(names, reports))
    }

    fn check_dataset(&self, product: &DataProduct, dataset: &Dataset) -> ValidationReport {
        let ctx = RuleContext::new(&self.config).with_data_product(product);
        let mut report = ValidationReport::for_entity(dataset.entity_ref())
            .with_attributes(dataset.attributes())
            .with_columns(dataset.columns.clone());
        for result in self.rules.evaluate_dataset(dataset, &ctx) {
            report.add_result(result);
        }
        report
    }

    /// Check one named data product of a domain together with its datasets
    ///
    /// The product's own results come first; children are keyed by dataset
    /// name, so a failing dataset fails the product report.
    pub fn check_data_product_tree(
        &self,
        domain_name: &str,
        product_name: &str,
    ) -> CheckerResult<ValidationReport> {
        tracing::info!("Checking data product tree '{}/{}'", domain_name, product_name);
        let domain = self.provider.get_domain(domain_name)?;
        let product = self.provider.get_data_product(domain_name, product_name)?;
        self.product_tree(&domain, &product)
    }

    fn product_tree(&self, domain: &Domain, product: &DataProduct) -> CheckerResult<ValidationReport> {
        let mut report = self.check_data_product(domain, product);
        report.children = self.check_data_product_all_datasets(product)?.children;
        Ok(report)
    }

    /// Check a domain, each of its data products and each of their datasets
    ///
    /// The domain's own results come first; children are keyed by product
    /// name, and each product report's children by dataset name.
    pub fn check_domain_tree(&self, domain_name: &str) -> CheckerResult<ValidationReport> {
        tracing::info!("Checking domain tree '{}'", domain_name);
        let domain = self.provider.get_domain(domain_name)?;
        let mut report = self.check_domain_descriptor(&domain);

        let names = self.provider.list_data_products(domain_name)?;
        let products = self.map_ordered(&names, |name| {
            let product = self.provider.get_data_product(domain_name, name)?;
            self.product_tree(&domain, &product)
        })?;

        report.children = keyed(names, products).children;
        Ok(report)
    }

    /// Domains covered by `run_checks`, in catalog order
    pub fn domains_in_scope(&self) -> CheckerResult<Vec<String>> {
        let mut selected = Vec::new();
        for name in self.provider.list_domains()? {
            if self.config.scope.matches(&name)? {
                selected.push(name);
            } else {
                tracing::debug!("Domain '{}' is outside the configured scope", name);
            }
        }
        Ok(selected)
    }

    /// Check every domain in scope recursively, keyed by domain name
    pub fn run_checks(&self) -> CheckerResult<ValidationReport> {
        let names = self.domains_in_scope()?;
        tracing::info!("Running checks on {} domain(s)", names.len());

        let reports = self.map_ordered(&names, |name| self.check_domain_tree(name))?;
        let report = keyed(names, reports);

        let summary = report.summary();
        tracing::info!(
            "Checked {} entities: {} passed, {} failed",
            summary.entities.total(),
            summary.passed,
            summary.failed()
        );
        Ok(report)
    }

    /// Run `check` on each item, sequentially or in parallel, keeping input order
    fn map_ordered<T, F>(&self, items: &[T], check: F) -> CheckerResult<Vec<ValidationReport>>
    where
        T: Sync,
        F: Fn(&T) -> CheckerResult<ValidationReport> + Sync + Send,
    {
        if self.options.parallel && items.len() > 1 {
            items.par_iter().map(check).collect()
        } else {
            items.iter().map(check).collect()
        }
    }
}

fn keyed(keys: Vec<String>, reports: Vec<ValidationReport>) -> ValidationReport {
    let mut aggregate = ValidationReport::new();
    for (key, report) in keys.into_iter().zip(reports) {
        aggregate.add_child(key, report);
    }
    aggregate
}
