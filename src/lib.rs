pub mod catalog;
pub mod config;
pub mod curation;
pub mod dataset;
pub mod error;
pub mod freshness;
pub mod logging;
pub mod model;
pub mod registry;
pub mod versioning;

pub use catalog::{Catalog, CatalogBuilder, ProjectProvider, SharedCatalog};
pub use error::{CatalogError, FinalizeError, VersionError};
