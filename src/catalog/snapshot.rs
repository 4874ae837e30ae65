//! Catalog exports read from YAML or JSON files
//!
//! A snapshot is re-read on every provider call so each check sees the file
//! as it is at that moment. A directory snapshot merges every `.yaml`, `.yml`
//! and `.json` file below it in file-name order.

use super::memory::InMemoryCatalog;
use super::DescriptorProvider;
use crate::domain::descriptors::{DataProduct, Dataset, Domain};
use crate::domain::results::{CheckerError, CheckerResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Serialized form of a catalog export
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub domains: Vec<DomainEntry>,
}

/// A domain together with the data products registered under it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEntry {
    pub name: String,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub schema_location: Option<String>,
    /// Registered products; their order is the domain's listing order
    #[serde(default)]
    pub data_products: Vec<DataProductEntry>,
}

/// A data product as exported under its domain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataProductEntry {
    pub name: String,
    /// Back-reference; defaults to the enclosing domain
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub owners: Vec<String>,
    #[serde(default, alias = "summary")]
    pub description: Option<String>,
    #[serde(default)]
    pub catalog_name: Option<String>,
    #[serde(default)]
    pub schema_name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, alias = "views")]
    pub datasets: Vec<Dataset>,
    #[serde(default)]
    pub materialized_views: Vec<String>,
}

impl DataProductEntry {
    fn into_descriptor(self, enclosing_domain: &str) -> DataProduct {
        DataProduct {
            name: self.name,
            domain: self.domain.unwrap_or_else(|| enclosing_domain.to_string()),
            owners: self.owners,
            description: self.description,
            catalog_name: self.catalog_name,
            schema_name: self.schema_name,
            location: self.location,
            tags: self.tags,
            datasets: self.datasets,
            materialized_views: self.materialized_views,
        }
    }
}

/// Supported snapshot encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Yaml,
    Json,
}

impl SnapshotFormat {
    /// Infer the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_lowercase().as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

impl CatalogDocument {
    /// Parse a document from text
    pub fn parse(content: &str, format: SnapshotFormat) -> CheckerResult<Self> {
        match format {
            SnapshotFormat::Yaml => serde_yaml::from_str(content)
                .map_err(|e| CheckerError::malformed(format!("Invalid YAML catalog: {e}"))),
            SnapshotFormat::Json => serde_json::from_str(content)
                .map_err(|e| CheckerError::malformed(format!("Invalid JSON catalog: {e}"))),
        }
    }

    /// Validate the document into an in-memory catalog
    pub fn into_catalog(self) -> CheckerResult<InMemoryCatalog> {
        let mut builder = InMemoryCatalog::builder();
        for entry in self.domains {
            let domain = Domain {
                name: entry.name.clone(),
                owner: entry.owner,
                description: entry.description,
                schema_location: entry.schema_location,
                data_products: entry.data_products.iter().map(|p| p.name.clone()).collect(),
            };
            builder = builder.domain(domain);
            for product in entry.data_products {
                builder = builder.data_product_in(&entry.name, product.into_descriptor(&entry.name));
            }
        }
        builder.build()
    }
}

/// Provider backed by a catalog export on disk
#[derive(Debug, Clone)]
pub struct SnapshotCatalog {
    path: PathBuf,
}

impl SnapshotCatalog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    /// Read and validate the snapshot as it currently is on disk
    pub fn load(&self) -> CheckerResult<InMemoryCatalog> {
        let files = self.snapshot_files()?;
        let mut merged = CatalogDocument::default();

        for (file, format) in files {
            let content = fs::read_to_string(&file).map_err(|e| {
                CheckerError::unavailable(format!("Failed to read '{}': {}", file.display(), e))
            })?;
            let document = CatalogDocument::parse(&content, format).map_err(|e| match e {
                CheckerError::Malformed { message } => {
                    CheckerError::malformed(format!("{}: {}", file.display(), message))
                }
                other => other,
            })?;
            merged.domains.extend(document.domains);
        }

        merged.into_catalog()
    }

    fn snapshot_files(&self) -> CheckerResult<Vec<(PathBuf, SnapshotFormat)>> {
        if self.path.is_file() {
            let format = SnapshotFormat::from_path(&self.path).unwrap_or(SnapshotFormat::Yaml);
            return Ok(vec![(self.path.clone(), format)]);
        }

        if !self.path.is_dir() {
            return Err(CheckerError::unavailable(format!(
                "Catalog snapshot '{}' does not exist",
                self.path.display()
            )));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.path).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                CheckerError::unavailable(format!(
                    "Failed to walk '{}': {}",
                    self.path.display(),
                    e
                ))
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(format) = SnapshotFormat::from_path(entry.path()) {
                files.push((entry.path().to_path_buf(), format));
            }
        }

        tracing::debug!("Found {} snapshot file(s) under {}", files.len(), self.path.display());
        Ok(files)
    }
}

impl DescriptorProvider for SnapshotCatalog {
    fn list_domains(&self) -> CheckerResult<Vec<String>> {
        self.load()?.list_domains()
    }

    fn get_domain(&self, name: &str) -> CheckerResult<Domain> {
        self.load()?.get_domain(name)
    }

    fn list_data_products(&self, domain: &str) -> CheckerResult<Vec<String>> {
        self.load()?.list_data_products(domain)
    }

    fn get_data_product(&self, domain: &str, product: &str) -> CheckerResult<DataProduct> {
        self.load()?.get_data_product(domain, product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::descriptors::EntityKind;
    use tempfile::TempDir;

    const FINANCE_YAML: &str = r#"
domains:
  - name: finance
    owner: finance-team
    description: Finance domain
    schema_location: s3://starburst/finance
    data_products:
      - name: financial_reports
        owners: [alice]
        summary: Monthly reports
        catalog_name: minio
        tags: [gold]
        views:
          - name: monthly_revenue
            description: Revenue by month
            columns:
              - { name: month, type: date, description: Month }
      - name: tax_ledger
        domain: accounting
"#;

    #[test]
    fn test_load_yaml_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("catalog.yaml");
        fs::write(&file, FINANCE_YAML).unwrap();

        let catalog = SnapshotCatalog::new(&file);
        assert_eq!(catalog.list_domains().unwrap(), vec!["finance"]);
        assert_eq!(
            catalog.list_data_products("finance").unwrap(),
            vec!["financial_reports", "tax_ledger"]
        );

        let product = catalog.get_data_product("finance", "financial_reports").unwrap();
        assert_eq!(product.domain, "finance");
        assert_eq!(product.description.as_deref(), Some("Monthly reports"));
        assert_eq!(catalog.list_datasets(&product).unwrap()[0].columns[0].data_type, "date");

        let ledger = catalog.get_data_product("finance", "tax_ledger").unwrap();
        assert_eq!(ledger.domain, "accounting");
    }

    #[test]
    fn test_directory_snapshot_merges_files_in_name_order() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("b_finance.yaml"), FINANCE_YAML).unwrap();
        fs::write(
            temp_dir.path().join("a_marketing.json"),
            r#"{"domains": [{"name": "marketing", "owner": "growth"}]}"#,
        )
        .unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "ignored").unwrap();

        let catalog = SnapshotCatalog::new(temp_dir.path());
        assert_eq!(catalog.list_domains().unwrap(), vec!["marketing", "finance"]);
    }

    #[test]
    fn test_missing_snapshot_is_unavailable() {
        let temp_dir = TempDir::new().unwrap();
        let catalog = SnapshotCatalog::new(temp_dir.path().join("missing.yaml"));

        let err = catalog.get_domain("finance").unwrap_err();
        assert!(matches!(err, CheckerError::ProviderUnavailable { .. }));
    }

    #[test]
    fn test_invalid_snapshot_is_malformed() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("catalog.yaml");
        fs::write(&file, "domains: [ { owner: nobody } ]").unwrap();

        let err = SnapshotCatalog::new(&file).list_domains().unwrap_err();
        assert!(matches!(err, CheckerError::Malformed { .. }));
    }

    #[test]
    fn test_snapshot_reflects_file_changes_between_calls() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("catalog.yaml");
        fs::write(&file, FINANCE_YAML).unwrap();
        let catalog = SnapshotCatalog::new(&file);
        assert!(catalog.get_domain("finance").is_ok());

        fs::write(&file, "domains: []").unwrap();
        let err = catalog.get_domain("finance").unwrap_err();
        assert!(matches!(err, CheckerError::NotFound { kind: EntityKind::Domain, .. }));
    }
}
