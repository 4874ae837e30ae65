//! Configuration loading and management for the datamesh checker
//!
//! Architecture: Anti-Corruption Layer - Configuration translates external YAML formats
//! - Raw YAML structures are converted to validated rule parameters
//! - Defaults mirror the catalog conventions the rules were written for
//! - Configuration tunes fixed rules and the run scope; it never adds or removes rules

use crate::domain::results::{CheckerError, CheckerResult};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

/// Configuration file names looked up in the working directory
pub const DEFAULT_CONFIG_FILES: [&str; 3] =
    ["datamesh_checker.yaml", "datamesh_checker.yml", ".datamesh_checker.yaml"];

/// Main configuration structure for the checker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckerConfig {
    /// Configuration format version
    pub version: String,
    /// Naming convention parameters
    #[serde(default)]
    pub naming: NamingPolicy,
    /// Required-metadata parameters
    #[serde(default)]
    pub metadata: MetadataPolicy,
    /// Domains covered by a full catalog run
    #[serde(default)]
    pub scope: RunScope,
}

/// Naming style enforced on domain and data product names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingStyle {
    /// `lowercase_with_underscores`; the first word is letters only, later words may hold digits
    SnakeCase,
    /// Space-separated `UpperCamelCase` words or short uppercase acronyms
    TitleWords,
}

impl NamingStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SnakeCase => "snake_case",
            Self::TitleWords => "title_words",
        }
    }
}

/// Naming convention parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamingPolicy {
    /// Style for domain and data product names
    #[serde(default = "default_style")]
    pub style: NamingStyle,
    /// Minimum name length in characters
    #[serde(default = "default_min_length")]
    pub min_length: usize,
    /// Maximum name length in characters
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

impl Default for NamingPolicy {
    fn default() -> Self {
        Self {
            style: default_style(),
            min_length: default_min_length(),
            max_length: default_max_length(),
        }
    }
}

/// Required-metadata parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataPolicy {
    /// Prefix every domain schema location must start with
    #[serde(default = "default_schema_location_prefix")]
    pub schema_location_prefix: String,
    /// Catalogs data products may be published to
    #[serde(default = "default_allowed_catalogs")]
    pub allowed_catalogs: Vec<String>,
}

impl Default for MetadataPolicy {
    fn default() -> Self {
        Self {
            schema_location_prefix: default_schema_location_prefix(),
            allowed_catalogs: default_allowed_catalogs(),
        }
    }
}

/// Glob filters selecting the domains of a full catalog run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunScope {
    /// Domain name patterns to include
    #[serde(default = "default_include")]
    pub include: Vec<String>,
    /// Domain name patterns to exclude, applied after `include`
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Default for RunScope {
    fn default() -> Self {
        Self { include: default_include(), exclude: Vec::new() }
    }
}

impl RunScope {
    /// Scope covering exactly the named domains
    pub fn only<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            include: domains.into_iter().map(|d| glob::Pattern::escape(d.as_ref())).collect(),
            exclude: Vec::new(),
        }
    }

    /// Whether a domain name falls inside this scope
    pub fn matches(&self, domain: &str) -> CheckerResult<bool> {
        let included = any_match(&self.include, domain)?;
        Ok(included && !any_match(&self.exclude, domain)?)
    }
}

fn any_match(patterns: &[String], name: &str) -> CheckerResult<bool> {
    for pattern in patterns {
        let compiled = glob::Pattern::new(pattern).map_err(|e| {
            CheckerError::config(format!("Invalid scope pattern '{pattern}': {e}"))
        })?;
        if compiled.matches(name) {
            return Ok(true);
        }
    }
    Ok(false)
}

impl CheckerConfig {
    /// Load configuration from a YAML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> CheckerResult<Self> {
        let contents = fs::read_to_string(&path).map_err(|e| {
            CheckerError::config(format!(
                "Failed to read config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let config: Self = serde_yaml::from_str(&contents).map_err(|e| {
            CheckerError::config(format!(
                "Failed to parse config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from string content
    pub fn load_from_str(content: &str) -> CheckerResult<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| CheckerError::config(format!("Failed to parse config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Load the first default config file present in `dir`, or the built-in defaults
    pub fn discover<P: AsRef<Path>>(dir: P) -> CheckerResult<Self> {
        for name in DEFAULT_CONFIG_FILES {
            let candidate = dir.as_ref().join(name);
            if candidate.is_file() {
                tracing::debug!("Loading configuration from {}", candidate.display());
                return Self::load_from_file(candidate);
            }
        }
        Ok(Self::default())
    }

    /// Validate the configuration for consistency and correctness
    pub fn validate(&self) -> CheckerResult<()> {
        if !["1.0"].contains(&self.version.as_str()) {
            return Err(CheckerError::config(format!(
                "Unsupported configuration version: {}. Supported versions: 1.0",
                self.version
            )));
        }

        if self.naming.min_length == 0 {
            return Err(CheckerError::config("naming.min_length must be at least 1"));
        }

        if self.naming.min_length > self.naming.max_length {
            return Err(CheckerError::config(format!(
                "naming.min_length ({}) exceeds naming.max_length ({})",
                self.naming.min_length, self.naming.max_length
            )));
        }

        if self.metadata.allowed_catalogs.iter().all(|c| c.trim().is_empty()) {
            return Err(CheckerError::config("metadata.allowed_catalogs must not be empty"));
        }

        for pattern in self.scope.include.iter().chain(&self.scope.exclude) {
            glob::Pattern::new(pattern).map_err(|e| {
                CheckerError::config(format!("Invalid scope pattern '{pattern}': {e}"))
            })?;
        }

        Ok(())
    }

    /// SHA-256 fingerprint of the configuration, stable across runs
    pub fn fingerprint(&self) -> String {
        // Struct field order is fixed, so the compact JSON form is canonical
        let canonical = serde_json::to_vec(self).unwrap_or_default();
        let digest = Sha256::digest(&canonical);
        digest.iter().take(8).map(|b| format!("{b:02x}")).collect()
    }
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            naming: NamingPolicy::default(),
            metadata: MetadataPolicy::default(),
            scope: RunScope::default(),
        }
    }
}

fn default_style() -> NamingStyle {
    NamingStyle::SnakeCase
}

fn default_min_length() -> usize {
    3
}

fn default_max_length() -> usize {
    64
}

fn default_schema_location_prefix() -> String {
    "s3://starburst/".to_string()
}

fn default_allowed_catalogs() -> Vec<String> {
    vec!["minio".to_string(), "minio_robin".to_string()]
}

fn default_include() -> Vec<String> {
    vec!["*".to_string()]
}

/// Configuration builder for programmatic construction
pub struct ConfigBuilder {
    config: CheckerConfig,
}

impl ConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self { config: CheckerConfig::default() }
    }

    /// Set the naming style for domains and data products
    pub fn naming_style(mut self, style: NamingStyle) -> Self {
        self.config.naming.style = style;
        self
    }

    /// Set the name length bounds
    pub fn name_length(mut self, min: usize, max: usize) -> Self {
        self.config.naming.min_length = min;
        self.config.naming.max_length = max;
        self
    }

    /// Set the schema location prefix
    pub fn schema_location_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.metadata.schema_location_prefix = prefix.into();
        self
    }

    /// Replace the allowed catalogs
    pub fn allowed_catalogs<I, S>(mut self, catalogs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.metadata.allowed_catalogs = catalogs.into_iter().map(Into::into).collect();
        self
    }

    /// Set the run scope
    pub fn scope(mut self, scope: RunScope) -> Self {
        self.config.scope = scope;
        self
    }

    /// Build the final configuration
    pub fn build(self) -> CheckerResult<CheckerConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
