// betflow-core/src/application/compile.rs

use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use crate::domain::compiler::{CompiledTest, compile_with_contract};
use crate::domain::ports::TemplateEngine;
use crate::domain::project::Manifest;
use crate::domain::quality::contract_checks;
use crate::error::BetflowError;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::atomic_write;

pub struct CompileOutput {
    pub tests: Vec<CompiledTest>,
    pub manifest_path: PathBuf,
}

/// Compiles every enabled test and writes the artifacts under `target_dir`:
/// `manifest.json` and one `compiled/<model>/<unique_id>.sql` per test.
/// With `odds_contract`, the feed checks of the odds models are compiled too.
#[instrument(skip(manifest, renderer))]
pub fn compile_project(
    manifest: &Manifest,
    renderer: &dyn TemplateEngine,
    target_dir: &Path,
    odds_contract: bool,
) -> Result<CompileOutput, BetflowError> {
    let contract = if odds_contract {
        contract_checks(manifest)
    } else {
        Vec::new()
    };
    let tests = compile_with_contract(manifest, &contract, renderer)?;

    let compiled_dir = target_dir.join("compiled");
    for test in &tests {
        let path = compiled_dir
            .join(&test.model)
            .join(format!("{}.sql", test.unique_id));
        atomic_write(&path, format!("{}\n", test.sql))?;
    }

    let manifest_path = target_dir.join("manifest.json");
    let json = serde_json::to_string_pretty(manifest).map_err(InfrastructureError::JsonError)?;
    atomic_write(&manifest_path, json)?;

    info!(
        tests = tests.len(),
        contract = contract.len(),
        path = ?compiled_dir,
        "Tests compiled"
    );
    Ok(CompileOutput {
        tests,
        manifest_path,
    })
}
