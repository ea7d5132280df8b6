// betflow/src/commands/validate.rs
//
// USE CASE: Check every schema document without touching the database.

use std::path::PathBuf;

use betflow_core::domain::quality::contract_checks;
use betflow_core::infrastructure::compiler::SchemaDiscovery;
use betflow_core::infrastructure::config::scan_disabled_tests;

use super::load_project;

pub fn execute(project_dir: PathBuf) -> anyhow::Result<()> {
    let (config, manifest) = load_project(&project_dir)?;

    let columns: usize = manifest.models.iter().map(|m| m.columns.len()).sum();
    let (enabled, disabled) = manifest.test_counts();

    let commented: usize = SchemaDiscovery::documents(&project_dir, &config)?
        .iter()
        .map(|doc| scan_disabled_tests(&doc.content).len())
        .sum();

    for model in &manifest.models {
        println!("   📦 {} ({} columns)", model.name, model.columns.len());
    }
    if config.odds_contract {
        let contract = contract_checks(&manifest).len();
        println!("   📜 {} feed contract checks on odds models", contract);
    }
    println!(
        "\n✨ Schema is valid: {} models, {} columns, {} active tests ({} disabled, {} commented out).",
        manifest.models.len(),
        columns,
        enabled,
        disabled,
        commented
    );
    Ok(())
}
