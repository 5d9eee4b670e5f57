use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};

use release_catalog::catalog::{Catalog, CatalogBuilder};
use release_catalog::config::{self, CatalogConfig};
use release_catalog::dataset;
use release_catalog::error::CatalogError;
use release_catalog::logging::init_logging;
use release_catalog::model::{ProjectRelease, ReleaseReference};

#[derive(Parser)]
#[command(name = "release-catalog")]
#[command(version, about = "Registry of project releases and the releases they bundle")]
struct Cli {
    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory of project module files, overrides the config
    #[arg(long, global = true)]
    datasets: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load every dataset and report registration errors
    Check,
    /// List releases of a project, newest first
    Releases { project: String },
    /// Releases bundled by <project@version>
    BundledBy { reference: String },
    /// Releases that bundle <project@version>
    Bundlers { reference: String },
    /// Resolve an ID, title or alias to a project ID
    Resolve { name: String },
    /// Whether a project released within its expected interval
    Freshness {
        project: String,
        /// Evaluation date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Print a project's curation config as JSON
    Curation { project: String },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => CatalogConfig::load(path)
            .with_context(|| format!("Failed to load config {:?}", path))?,
        None => CatalogConfig::default(),
    };

    let log_path = config::log_path();
    let _guard = init_logging(&config.logging, &log_path)
        .with_context(|| format!("Failed to initialize logging at {:?}", log_path))?;

    let datasets_dir = cli.datasets.clone().unwrap_or_else(|| config.datasets_dir());
    let catalog = load_catalog(&datasets_dir, config.strict)?;

    match cli.command {
        Command::Check => {
            println!(
                "{} projects, {} releases, {} correlations",
                catalog.project_count(),
                catalog.release_count(),
                catalog.graph().edge_count()
            );
        }
        Command::Releases { project } => {
            let releases = catalog
                .list_releases(&project)
                .with_context(|| format!("Unknown project: {}", project))?;
            for release in releases {
                println!("{}", release.version);
            }
        }
        Command::BundledBy { reference } => {
            let release = resolve_release(&catalog, &reference)?;
            print_releases(catalog.bundled_by(&release.key()).unwrap_or_default());
        }
        Command::Bundlers { reference } => {
            let release = resolve_release(&catalog, &reference)?;
            print_releases(catalog.bundlers(&release.key()).unwrap_or_default());
        }
        Command::Resolve { name } => match catalog.resolve_alias(&name) {
            Some(id) => println!("{}", id),
            None => bail!("No project named '{}'", name),
        },
        Command::Freshness { project, today } => {
            let today = today.unwrap_or_else(|| chrono::Local::now().date_naive());
            let freshness = catalog
                .freshness(&project, today, config.freshness.grace_days)
                .with_context(|| format!("Unknown project: {}", project))?;
            println!("{}", serde_json::to_string_pretty(&freshness)?);
        }
        Command::Curation { project } => {
            if catalog.lookup(&project).is_none() {
                bail!("Unknown project: {}", project);
            }
            match catalog.curation_config(&project) {
                Some(curation) => println!("{}", serde_json::to_string_pretty(curation)?),
                None => println!("null"),
            }
        }
    }

    Ok(())
}

fn load_catalog(datasets_dir: &Path, strict: bool) -> anyhow::Result<Catalog> {
    let modules = dataset::load_dir(datasets_dir)
        .with_context(|| format!("Failed to load datasets from {:?}", datasets_dir))?;

    let mut builder = CatalogBuilder::new();
    for module in &modules {
        if let Err(e) = builder.register_provider(module) {
            if strict {
                return Err(e).with_context(|| format!("Failed to register {}", module.project.id));
            }
            match e {
                CatalogError::DuplicateProjectId { .. } | CatalogError::InvalidVersioning { .. } => {
                    warn!("Skipping module {}: {}", module.project.id, e)
                }
                _ => warn!(
                    "Module {} registered without its rejected part: {}",
                    module.project.id, e
                ),
            }
        }
    }

    if strict {
        match builder.finalize() {
            Ok(catalog) => Ok(catalog),
            Err(e) => {
                for err in e.errors() {
                    error!("{}", err);
                    eprintln!("error: {}", err);
                }
                Err(e.into())
            }
        }
    } else {
        let (catalog, errors) = builder.finalize_lenient();
        for err in &errors {
            eprintln!("warning: {}", err);
        }
        info!(
            "Catalog finalized with {} skipped registrations",
            errors.len()
        );
        Ok(catalog)
    }
}

fn resolve_release<'a>(catalog: &'a Catalog, reference: &str) -> anyhow::Result<&'a ProjectRelease> {
    let parsed = ReleaseReference::parse(reference)?;
    catalog
        .resolve(&parsed)
        .with_context(|| format!("Unknown release: {}", reference))
}

fn print_releases(releases: Vec<&ProjectRelease>) {
    for release in releases {
        println!("{}", release.key());
    }
}
