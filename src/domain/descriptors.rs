//! Read-only catalog descriptors
//!
//! Architecture: Value Objects - Descriptors are immutable snapshots of catalog entities
//! - Fields are fixed and statically declared, validated once at the provider boundary
//! - Optional attributes stay optional so rules can report their absence instead of failing
//! - The checker only ever borrows descriptors for the duration of a check

use crate::domain::results::Attribute;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of catalog entity a rule or result refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Domain,
    DataProduct,
    Dataset,
}

impl EntityKind {
    /// Convert to string for display
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::DataProduct => "data product",
            Self::Dataset => "dataset",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to a single catalog entity
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub name: String,
}

impl EntityRef {
    pub fn new(kind: EntityKind, name: impl Into<String>) -> Self {
        Self { kind, name: name.into() }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind, self.name)
    }
}

/// A logical data-mesh domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    /// Unique domain name
    pub name: String,
    /// Owning team or person
    #[serde(default)]
    pub owner: Option<String>,
    /// Free-text description
    #[serde(default)]
    pub description: Option<String>,
    /// Object-store location holding the domain schemas
    #[serde(default)]
    pub schema_location: Option<String>,
    /// Names of the data products assigned to the domain, in catalog order
    #[serde(default)]
    pub data_products: Vec<String>,
}

impl Domain {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owner: None,
            description: None,
            schema_location: None,
            data_products: Vec::new(),
        }
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_schema_location(mut self, location: impl Into<String>) -> Self {
        self.schema_location = Some(location.into());
        self
    }

    pub fn with_data_product(mut self, name: impl Into<String>) -> Self {
        self.data_products.push(name.into());
        self
    }

    /// Whether the domain lists a data product with the given name
    pub fn lists_data_product(&self, name: &str) -> bool {
        self.data_products.iter().any(|p| p == name)
    }

    pub fn entity_ref(&self) -> EntityRef {
        EntityRef::new(EntityKind::Domain, &self.name)
    }

    /// Values recorded in audit reports
    pub fn attributes(&self) -> Vec<Attribute> {
        vec![
            Attribute::new("owner", display_optional(&self.owner)),
            Attribute::new("description", display_optional(&self.description)),
            Attribute::new("schema location", display_optional(&self.schema_location)),
        ]
    }
}

/// A published data product belonging to exactly one domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataProduct {
    /// Name, unique within its domain
    pub name: String,
    /// Name of the owning domain
    pub domain: String,
    /// Owners of the product
    #[serde(default)]
    pub owners: Vec<String>,
    /// Summary shown in the catalog
    #[serde(default)]
    pub description: Option<String>,
    /// Query-engine catalog the product is published to
    #[serde(default)]
    pub catalog_name: Option<String>,
    /// Schema the product's datasets live in
    #[serde(default)]
    pub schema_name: Option<String>,
    /// Storage location of the product
    #[serde(default)]
    pub location: Option<String>,
    /// Catalog tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Datasets published as views, in declared order
    #[serde(default)]
    pub datasets: Vec<Dataset>,
    /// Names of datasets published as materialized views
    #[serde(default)]
    pub materialized_views: Vec<String>,
}

impl DataProduct {
    pub fn new(name: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            domain: domain.into(),
            owners: Vec::new(),
            description: None,
            catalog_name: None,
            schema_name: None,
            location: None,
            tags: Vec::new(),
            datasets: Vec::new(),
            materialized_views: Vec::new(),
        }
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owners.push(owner.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_catalog(mut self, catalog: impl Into<String>) -> Self {
        self.catalog_name = Some(catalog.into());
        self
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema_name = Some(schema.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_dataset(mut self, dataset: Dataset) -> Self {
        self.datasets.push(dataset);
        self
    }

    pub fn with_materialized_view(mut self, name: impl Into<String>) -> Self {
        self.materialized_views.push(name.into());
        self
    }

    pub fn entity_ref(&self) -> EntityRef {
        EntityRef::new(EntityKind::DataProduct, &self.name)
    }

    /// Values recorded in audit reports
    pub fn attributes(&self) -> Vec<Attribute> {
        vec![
            Attribute::new("domain", &self.domain),
            Attribute::new("owners", display_list(&self.owners)),
            Attribute::new("description", display_optional(&self.description)),
            Attribute::new("catalog", display_optional(&self.catalog_name)),
            Attribute::new("schema", display_optional(&self.schema_name)),
            Attribute::new("location", display_optional(&self.location)),
            Attribute::new("tags", display_list(&self.tags)),
        ]
    }
}

/// A schema-bearing unit inside a data product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub columns: Vec<Column>,
    /// Storage location reference
    #[serde(default)]
    pub location: Option<String>,
}

impl Dataset {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), description: None, columns: Vec::new(), location: None }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn entity_ref(&self) -> EntityRef {
        EntityRef::new(EntityKind::Dataset, &self.name)
    }

    /// Values recorded in audit reports; columns are listed separately
    pub fn attributes(&self) -> Vec<Attribute> {
        vec![
            Attribute::new("description", display_optional(&self.description)),
            Attribute::new("location", display_optional(&self.location)),
        ]
    }
}

/// Column descriptor of a dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(default, rename = "type", alias = "data_type")]
    pub data_type: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self { name: name.into(), data_type: data_type.into(), description: None }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Whether the column carries a non-blank description
    pub fn is_described(&self) -> bool {
        has_text(self.description.as_deref())
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.data_type)
    }
}

/// Whether an optional attribute holds non-whitespace text
pub fn has_text(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

fn display_optional(value: &Option<String>) -> String {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => "(none)".to_string(),
    }
}

fn display_list(values: &[String]) -> String {
    let shown: Vec<&str> =
        values.iter().map(|v| v.trim()).filter(|v| !v.is_empty()).collect();
    if shown.is_empty() {
        "(none)".to_string()
    } else {
        shown.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_product_attributes() {
        let product = DataProduct::new("financial_reports", "finance")
            .with_owner("alice")
            .with_schema("reports")
            .with_location("s3://starburst/finance/reports")
            .with_tag(" ")
            .with_tag("gold");

        let attributes = product.attributes();
        let value = |name: &str| {
            attributes.iter().find(|a| a.name == name).map(|a| a.value.clone()).unwrap()
        };
        assert_eq!(value("schema"), "reports");
        assert_eq!(value("location"), "s3://starburst/finance/reports");
        assert_eq!(value("tags"), "gold");
        assert_eq!(value("catalog"), "(none)");
    }

    #[test]
    fn test_domain_builder() {
        let domain = Domain::new("finance")
            .with_owner("finance-team")
            .with_data_product("financial_reports")
            .with_data_product("tax_ledger");

        assert_eq!(domain.owner.as_deref(), Some("finance-team"));
        assert!(domain.lists_data_product("tax_ledger"));
        assert!(!domain.lists_data_product("payroll"));
        assert_eq!(domain.entity_ref().to_string(), "domain 'finance'");
    }

    #[test]
    fn test_has_text() {
        assert!(has_text(Some("owner")));
        assert!(!has_text(Some("   ")));
        assert!(!has_text(Some("")));
        assert!(!has_text(None));
    }

    #[test]
    fn test_column_deserializes_type_alias() {
        let column: Column =
            serde_yaml::from_str("name: month\ndata_type: date\ndescription: Month").unwrap();
        assert_eq!(column.data_type, "date");
        assert!(column.is_described());

        let column: Column = serde_yaml::from_str("name: month\ntype: date").unwrap();
        assert_eq!(column.data_type, "date");
        assert!(!column.is_described());
    }
}
