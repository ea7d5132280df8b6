// betflow/src/commands/inspect.rs
//
// USE CASE: Show what the schema documents declare.

use comfy_table::Table;
use comfy_table::presets::UTF8_FULL;
use std::path::PathBuf;

use betflow_core::infrastructure::compiler::SchemaDiscovery;
use betflow_core::infrastructure::config::scan_disabled_tests;

use super::load_project;

pub fn execute(project_dir: PathBuf, disabled: bool) -> anyhow::Result<()> {
    let (config, manifest) = load_project(&project_dir)?;

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);

    if disabled {
        table.set_header(vec!["File", "Line", "Model", "Column", "Test", "Known"]);
        let mut count = 0;
        for doc in SchemaDiscovery::documents(&project_dir, &config)? {
            for entry in scan_disabled_tests(&doc.content) {
                count += 1;
                table.add_row(vec![
                    doc.path.display().to_string(),
                    entry.line.to_string(),
                    match (&entry.anchor, entry.aliased) {
                        (Some(anchor), true) => format!(
                            "{} (via &{})",
                            entry.model.as_deref().unwrap_or_default(),
                            anchor
                        ),
                        _ => entry.model.clone().unwrap_or_default(),
                    },
                    entry.column.unwrap_or_default(),
                    entry.name,
                    if entry.recognised { "yes" } else { "no" }.to_string(),
                ]);
            }
        }
        println!("\n💤 {} commented-out tests (never executed)", count);
        println!("{table}");
        return Ok(());
    }

    table.set_header(vec!["Model", "Column", "Tests", "Description"]);
    for model in &manifest.models {
        for column in model.columns.iter() {
            let tests = column
                .tests
                .iter()
                .map(|t| {
                    if t.enabled {
                        t.name.clone()
                    } else {
                        format!("{} (disabled)", t.name)
                    }
                })
                .collect::<Vec<_>>()
                .join(", ");
            table.add_row(vec![
                model.name.clone(),
                column.name.clone(),
                tests,
                column.description.clone().unwrap_or_default(),
            ]);
        }
    }
    println!("{table}");
    Ok(())
}
