//! Domain layer for the datamesh checker
//!
//! CDD Principle: Domain Model - Pure business logic for catalog governance
//! - Contains the catalog descriptors and the validation result model
//! - Independent of infrastructure concerns like files, catalog clients or terminals
//! - Expresses the ubiquitous language of domains, data products and datasets

pub mod descriptors;
pub mod results;

// Re-export main domain types for convenience
pub use descriptors::*;
pub use results::*;
