//! Release catalog and correlation graph
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  register   ┌──────────────────┐  finalize  ┌─────────────┐
//! │   Project    │────────────▶│  CatalogBuilder  │───────────▶│   Catalog   │
//! │   modules    │             │ (raw batches +   │            │ (snapshot)  │
//! └──────────────┘             │  registry)       │            └─────────────┘
//!                              └──────────────────┘                   │
//!                                                     ┌───────────────┴──────────┐
//!                                                     ▼                          ▼
//!                                              ┌──────────────┐         ┌─────────────────┐
//!                                              │ReleaseCatalog│         │CorrelationGraph │
//!                                              │ (newest 1st) │         │ (fwd + reverse) │
//!                                              └──────────────┘         └─────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`builder`]: registration in any order and the finalize pass
//! - [`releases`]: per-project release storage and ordering
//! - [`graph`]: resolution of `project@version` references into edges
//! - [`snapshot`]: the finalized catalog and its atomic publication

pub mod builder;
pub mod graph;
pub mod releases;
pub mod snapshot;

pub use builder::{CatalogBuilder, ProjectProvider};
pub use graph::CorrelationGraph;
pub use releases::ReleaseCatalog;
pub use snapshot::{Catalog, SharedCatalog};
