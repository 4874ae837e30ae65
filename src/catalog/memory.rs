//! In-memory catalog used by embedders, tests and the snapshot loader

use super::DescriptorProvider;
use crate::domain::descriptors::{DataProduct, Domain, EntityKind};
use crate::domain::results::{CheckerError, CheckerResult};
use std::collections::HashSet;

/// Catalog held entirely in memory, preserving insertion order
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    domains: Vec<Domain>,
    /// Products grouped by the domain that registered them
    data_products: Vec<(String, Vec<DataProduct>)>,
}

impl InMemoryCatalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    fn domain(&self, name: &str) -> CheckerResult<&Domain> {
        self.domains
            .iter()
            .find(|d| d.name == name)
            .ok_or_else(|| CheckerError::not_found(EntityKind::Domain, name))
    }

    fn products_of(&self, domain: &str) -> &[DataProduct] {
        self.data_products
            .iter()
            .find(|(d, _)| d == domain)
            .map(|(_, products)| products.as_slice())
            .unwrap_or_default()
    }
}

impl DescriptorProvider for InMemoryCatalog {
    fn list_domains(&self) -> CheckerResult<Vec<String>> {
        Ok(self.domains.iter().map(|d| d.name.clone()).collect())
    }

    fn get_domain(&self, name: &str) -> CheckerResult<Domain> {
        self.domain(name).cloned()
    }

    fn list_data_products(&self, domain: &str) -> CheckerResult<Vec<String>> {
        Ok(self.domain(domain)?.data_products.clone())
    }

    fn get_data_product(&self, domain: &str, product: &str) -> CheckerResult<DataProduct> {
        self.domain(domain)?;
        self.products_of(domain)
            .iter()
            .find(|p| p.name == product)
            .cloned()
            .ok_or_else(|| CheckerError::not_found(EntityKind::DataProduct, product))
    }
}

/// Collects descriptors and validates them into an [`InMemoryCatalog`]
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    domains: Vec<Domain>,
    data_products: Vec<(String, DataProduct)>,
}

impl CatalogBuilder {
    /// Add a domain; its `data_products` field is the catalog listing order
    pub fn domain(mut self, domain: Domain) -> Self {
        self.domains.push(domain);
        self
    }

    /// Register a data product under the domain it references
    pub fn data_product(self, product: DataProduct) -> Self {
        let domain = product.domain.clone();
        self.data_product_in(domain, product)
    }

    /// Register a data product under an explicit domain, whatever it references
    pub fn data_product_in(mut self, domain: impl Into<String>, product: DataProduct) -> Self {
        self.data_products.push((domain.into(), product));
        self
    }

    /// Validate and build the catalog
    pub fn build(self) -> CheckerResult<InMemoryCatalog> {
        let mut seen_domains = HashSet::new();
        for domain in &self.domains {
            if domain.name.trim().is_empty() {
                return Err(CheckerError::malformed("Domain with an empty name"));
            }
            if !seen_domains.insert(domain.name.as_str()) {
                return Err(CheckerError::malformed(format!(
                    "Duplicate domain '{}'",
                    domain.name
                )));
            }
        }

        let mut grouped: Vec<(String, Vec<DataProduct>)> = Vec::new();
        for (domain, product) in self.data_products {
            if product.name.trim().is_empty() {
                return Err(CheckerError::malformed(format!(
                    "Data product with an empty name in domain '{domain}'"
                )));
            }
            if !seen_domains.contains(domain.as_str()) {
                return Err(CheckerError::malformed(format!(
                    "Data product '{}' is registered under unknown domain '{}'",
                    product.name, domain
                )));
            }
            validate_datasets(&domain, &product)?;

            let index = match grouped.iter().position(|(d, _)| *d == domain) {
                Some(index) => index,
                None => {
                    grouped.push((domain.clone(), Vec::new()));
                    grouped.len() - 1
                }
            };
            let products = &mut grouped[index].1;
            if products.iter().any(|p| p.name == product.name) {
                return Err(CheckerError::malformed(format!(
                    "Duplicate data product '{}' in domain '{}'",
                    product.name, domain
                )));
            }
            products.push(product);
        }

        Ok(InMemoryCatalog { domains: self.domains, data_products: grouped })
    }
}

fn validate_datasets(domain: &str, product: &DataProduct) -> CheckerResult<()> {
    let mut seen = HashSet::new();
    for dataset in &product.datasets {
        if dataset.name.trim().is_empty() {
            return Err(CheckerError::malformed(format!(
                "Dataset with an empty name in data product '{}/{}'",
                domain, product.name
            )));
        }
        if !seen.insert(dataset.name.as_str()) {
            return Err(CheckerError::malformed(format!(
                "Duplicate dataset '{}' in data product '{}/{}'",
                dataset.name, domain, product.name
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::descriptors::Dataset;

    fn catalog() -> InMemoryCatalog {
        InMemoryCatalog::builder()
            .domain(
                Domain::new("finance")
                    .with_data_product("tax_ledger")
                    .with_data_product("financial_reports"),
            )
            .domain(Domain::new("marketing"))
            .data_product(DataProduct::new("financial_reports", "finance"))
            .data_product(DataProduct::new("tax_ledger", "finance"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_listing_follows_catalog_order() {
        let catalog = catalog();
        assert_eq!(catalog.list_domains().unwrap(), vec!["finance", "marketing"]);
        assert_eq!(
            catalog.list_data_products("finance").unwrap(),
            vec!["tax_ledger", "financial_reports"]
        );
        assert!(catalog.list_data_products("marketing").unwrap().is_empty());
    }

    #[test]
    fn test_missing_entities_are_not_found() {
        let catalog = catalog();

        let err = catalog.get_domain("sales").unwrap_err();
        assert!(matches!(err, CheckerError::NotFound { kind: EntityKind::Domain, .. }));

        let err = catalog.get_data_product("finance", "nonexistent").unwrap_err();
        assert!(matches!(
            err,
            CheckerError::NotFound { kind: EntityKind::DataProduct, ref name } if name == "nonexistent"
        ));

        let err = catalog.get_data_product("sales", "tax_ledger").unwrap_err();
        assert!(matches!(err, CheckerError::NotFound { kind: EntityKind::Domain, .. }));
    }

    #[test]
    fn test_rejects_duplicates() {
        let err = InMemoryCatalog::builder()
            .domain(Domain::new("finance"))
            .domain(Domain::new("finance"))
            .build()
            .unwrap_err();
        assert!(matches!(err, CheckerError::Malformed { .. }));

        let err = InMemoryCatalog::builder()
            .domain(Domain::new("finance"))
            .data_product(DataProduct::new("ledger", "finance"))
            .data_product(DataProduct::new("ledger", "finance"))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("Duplicate data product"));

        let err = InMemoryCatalog::builder()
            .domain(Domain::new("finance"))
            .data_product(
                DataProduct::new("ledger", "finance")
                    .with_dataset(Dataset::new("entries"))
                    .with_dataset(Dataset::new("entries")),
            )
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("Duplicate dataset"));
    }

    #[test]
    fn test_rejects_product_of_unknown_domain() {
        let err = InMemoryCatalog::builder()
            .data_product(DataProduct::new("ledger", "finance"))
            .build()
            .unwrap_err();
        assert!(matches!(err, CheckerError::Malformed { .. }));
    }

    #[test]
    fn test_same_product_name_in_two_domains() {
        let catalog = InMemoryCatalog::builder()
            .domain(Domain::new("finance"))
            .domain(Domain::new("sales"))
            .data_product(DataProduct::new("ledger", "finance").with_tag("f"))
            .data_product(DataProduct::new("ledger", "sales").with_tag("s"))
            .build()
            .unwrap();

        assert_eq!(catalog.get_data_product("sales", "ledger").unwrap().tags, vec!["s"]);
    }
}
