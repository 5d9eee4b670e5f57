//! Dataset test utilities

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde_json::{Value, json};
use tempfile::TempDir;

use release_catalog::catalog::CatalogBuilder;
use release_catalog::dataset;

/// Directory of the project modules shipped with the crate
pub fn shipped_datasets_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("datasets")
}

/// Register every module found in `dir`
pub fn builder_from_dir(dir: &Path) -> CatalogBuilder {
    let mut builder = CatalogBuilder::new();
    for module in dataset::load_dir(dir).unwrap() {
        builder.register_provider(&module).unwrap();
    }
    builder
}

pub fn write_module(dir: &TempDir, file_name: &str, module: Value) {
    fs::write(dir.path().join(file_name), module.to_string()).unwrap();
}

/// Minimal kube module with the given versions
pub fn kube_module(versions: &[&str]) -> Value {
    let releases: Vec<Value> = versions
        .iter()
        .map(|v| json!({ "project": "kube", "version": v }))
        .collect();

    json!({
        "project": {
            "id": "kube",
            "title": "Kubernetes",
            "type": "kubernetes",
            "aliases": ["k8s"],
            "versioning": {
                "scheme": "semantic",
                "releaseCycle": "regular",
                "releaseIntervalDays": 120,
                "releasePatterns": ["<MAJOR>.<MINOR>.<PATCH>"]
            }
        },
        "releases": releases
    })
}

/// Minimal GKE module with one release per `(version, references)` pair
pub fn gke_module(releases: &[(&str, &[&str])]) -> Value {
    let releases: Vec<Value> = releases
        .iter()
        .map(|(version, references)| {
            json!({
                "project": "gke",
                "version": version,
                "relatedProjectReleases": references
            })
        })
        .collect();

    json!({
        "project": {
            "id": "gke",
            "title": "Google Kubernetes Engine (GKE)",
            "type": "kube_control_plane_provider",
            "aliases": ["cloud.google.com/gke"],
            "versioning": {
                "scheme": "calendar",
                "releaseCycle": "regular",
                "releaseIntervalDays": 90,
                "individualUpgradeRecommended": true,
                "releasePatterns": ["<YYYY>-R<MINOR>"]
            }
        },
        "releases": releases
    })
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
