// betflow/src/commands/mod.rs

pub mod clean;
pub mod compile;
pub mod data_tests;
pub mod inspect;
pub mod seed;
pub mod validate;

use anyhow::Context;
use std::path::Path;

use betflow_core::domain::ports::ManifestLoader;
use betflow_core::domain::project::{Manifest, ProjectConfig};
use betflow_core::infrastructure::adapters::DuckDBConnector;
use betflow_core::infrastructure::compiler::SchemaDiscovery;
use betflow_core::infrastructure::config::load_project_config;

/// Loads the project config and resolves every schema document.
pub fn load_project(project_dir: &Path) -> anyhow::Result<(ProjectConfig, Manifest)> {
    println!("⚙️  Loading configuration...");
    let config = load_project_config(project_dir).with_context(|| {
        format!(
            "Failed to load project configuration from {:?}",
            project_dir
        )
    })?;
    println!("   Project: {} (v{})", config.name, config.version);

    let manifest = SchemaDiscovery
        .load(project_dir, &config)
        .context("Schema validation failed")?;

    Ok((config, manifest))
}

/// Opens the configured DuckDB database, creating its directory when needed.
pub fn open_connector(project_dir: &Path, config: &ProjectConfig) -> anyhow::Result<DuckDBConnector> {
    let db_path = if config.database == ":memory:" {
        config.database.clone()
    } else {
        let path = project_dir.join(&config.database);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        path.display().to_string()
    };

    println!("   Engine: DuckDB 🦆 ({})", db_path);
    DuckDBConnector::new(&db_path)
        .with_context(|| format!("Failed to initialize DuckDB at {}", db_path))
}
