// betflow/src/commands/compile.rs
//
// USE CASE: Write the SQL of every enabled test.

use std::path::PathBuf;

use betflow_core::application::compile_project;
use betflow_core::infrastructure::compiler::JinjaRenderer;

use super::load_project;

pub fn execute(project_dir: PathBuf, select: Option<String>) -> anyhow::Result<()> {
    let (config, manifest) = load_project(&project_dir)?;
    let manifest = match select {
        Some(name) => manifest.select(&name)?,
        None => manifest,
    };

    let renderer = JinjaRenderer::new(config.vars.clone());
    let target_dir = project_dir.join(&config.target_path);
    let output = compile_project(&manifest, &renderer, &target_dir, config.odds_contract)?;

    println!(
        "✨ Compiled {} tests into {}",
        output.tests.len(),
        target_dir.join("compiled").display()
    );
    println!("   Manifest: {}", output.manifest_path.display());
    Ok(())
}
