//! Descriptor providers for catalog access
//!
//! Architecture: Ports and Adapters - The checker depends on the `DescriptorProvider` port only
//! - Providers hand out owned, read-only descriptors and never mutate the catalog
//! - Missing entities surface as `NotFound`, unreachable catalogs as `ProviderUnavailable`
//! - Descriptors are validated at this boundary so rules only see well-formed records

pub mod memory;
pub mod snapshot;

use crate::domain::descriptors::{DataProduct, Dataset, Domain};
use crate::domain::results::CheckerResult;

pub use memory::{CatalogBuilder, InMemoryCatalog};
pub use snapshot::{CatalogDocument, SnapshotCatalog};

/// Read-only source of catalog descriptors
///
/// Calls may block on I/O; implementations neither retry nor cache on behalf
/// of the checker.
pub trait DescriptorProvider: Send + Sync {
    /// Names of every domain in catalog order
    fn list_domains(&self) -> CheckerResult<Vec<String>>;

    /// Fetch a domain by name
    fn get_domain(&self, name: &str) -> CheckerResult<Domain>;

    /// Names of the data products of a domain in catalog order
    fn list_data_products(&self, domain: &str) -> CheckerResult<Vec<String>>;

    /// Fetch one data product of a domain
    fn get_data_product(&self, domain: &str, product: &str) -> CheckerResult<DataProduct>;

    /// Datasets of a data product in declared order
    fn list_datasets(&self, product: &DataProduct) -> CheckerResult<Vec<Dataset>> {
        Ok(product.datasets.clone())
    }
}

impl<P: DescriptorProvider + ?Sized> DescriptorProvider for &P {
    fn list_domains(&self) -> CheckerResult<Vec<String>> {
        (**self).list_domains()
    }

    fn get_domain(&self, name: &str) -> CheckerResult<Domain> {
        (**self).get_domain(name)
    }

    fn list_data_products(&self, domain: &str) -> CheckerResult<Vec<String>> {
        (**self).list_data_products(domain)
    }

    fn get_data_product(&self, domain: &str, product: &str) -> CheckerResult<DataProduct> {
        (**self).get_data_product(domain, product)
    }

    fn list_datasets(&self, product: &DataProduct) -> CheckerResult<Vec<Dataset>> {
        (**self).list_datasets(product)
    }
}

impl<P: DescriptorProvider + ?Sized> DescriptorProvider for Box<P> {
    fn list_domains(&self) -> CheckerResult<Vec<String>> {
        (**self).list_domains()
    }

    fn get_domain(&self, name: &str) -> CheckerResult<Domain> {
        (**self).get_domain(name)
    }

    fn list_data_products(&self, domain: &str) -> CheckerResult<Vec<String>> {
        (**self).list_data_products(domain)
    }

    fn get_data_product(&self, domain: &str, product: &str) -> CheckerResult<DataProduct> {
        (**self).get_data_product(domain, product)
    }

    fn list_datasets(&self, product: &DataProduct) -> CheckerResult<Vec<Dataset>> {
        (**self).list_datasets(product)
    }
}
