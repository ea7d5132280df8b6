// betflow/src/commands/seed.rs
//
// USE CASE: Load CSV seeds into the project database.

use anyhow::Context;
use std::path::PathBuf;

use betflow_core::application::load_seeds;
use betflow_core::infrastructure::config::load_project_config;

use super::open_connector;

pub async fn execute(project_dir: PathBuf) -> anyhow::Result<()> {
    let config = load_project_config(&project_dir).with_context(|| {
        format!(
            "Failed to load project configuration from {:?}",
            project_dir
        )
    })?;
    let connector = open_connector(&project_dir, &config)?;

    let loaded = load_seeds(&project_dir, &config, &connector).await?;
    for name in &loaded {
        println!("   🌱 {}", name);
    }
    println!("✨ {} seeds loaded.", loaded.len());
    Ok(())
}
